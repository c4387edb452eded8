pub type RegistrarError = Box<dyn std::error::Error + Send + Sync>;

/// Platform side effect announcing that a template identifier now exists.
///
/// Invoked once per save, after the template folder is recreated and before
/// content lands in it; a failure rolls the whole save back.
pub trait TemplateRegistrar: Send + Sync {
    /// Name used in error reporting.
    fn name(&self) -> &'static str;

    fn register(&self, template_id: &str) -> std::result::Result<(), RegistrarError>;
}

/// Registrar for deployments without a platform lifecycle manager.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopRegistrar;

impl TemplateRegistrar for NoopRegistrar {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn register(&self, _template_id: &str) -> std::result::Result<(), RegistrarError> {
        Ok(())
    }
}
