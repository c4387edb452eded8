use std::io::{Cursor, Read};

use templar_archive::{EntryEncoding, build_archive_filtered, detect_encoding, extract_into};
use templar_repo::{Location, Repository};
use tracing::{debug, warn};

use crate::error::{Error, Result, StepError};
use crate::registrar::{NoopRegistrar, TemplateRegistrar};

/// Fixed locations the store works against.
#[derive(Clone, Debug)]
pub struct TemplateStoreOptions {
    root: Location,
    hash_file_name: String,
}

impl Default for TemplateStoreOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateStoreOptions {
    pub fn new() -> Self {
        Self {
            root: Location::new(".templates"),
            hash_file_name: ".templatehash".to_owned(),
        }
    }

    /// Subtree of the store holding one folder per template.
    pub fn root(mut self, root: Location) -> Self {
        self.root = root;
        self
    }

    /// Name of the integrity-hash sidecar file inside each template folder.
    pub fn hash_file_name(mut self, name: impl Into<String>) -> Self {
        self.hash_file_name = name.into();
        self
    }
}

/// Imports ZIP-packaged templates into the store and exports stored
/// subtrees back out, with recreate-or-rollback write semantics.
pub struct TemplateStore<R> {
    repo: R,
    options: TemplateStoreOptions,
    registrar: Box<dyn TemplateRegistrar>,
}

impl<R: Repository> TemplateStore<R> {
    pub fn new(repo: R, options: TemplateStoreOptions) -> Self {
        Self {
            repo,
            options,
            registrar: Box::new(NoopRegistrar),
        }
    }

    pub fn with_registrar(mut self, registrar: impl TemplateRegistrar + 'static) -> Self {
        self.registrar = Box::new(registrar);
        self
    }

    fn template_folder(&self, template_id: &str) -> Location {
        self.options.root.join(template_id)
    }

    fn processing(id: &str, source: impl Into<StepError>) -> Error {
        Error::Processing {
            id: id.to_owned(),
            source: source.into(),
        }
    }

    /// Import `raw` as the new content of template `id`.
    ///
    /// If no candidate entry encoding can enumerate the archive the save
    /// fails before touching the store. Past that point the target folder is
    /// recreated from scratch, and any failure deletes it again, so no
    /// partial generation is ever observable.
    pub fn save(&self, id: &str, raw: &[u8], hash: Option<&str>) -> Result<()> {
        let id = validate_template_id(id)?;
        let Some(encoding) = detect_encoding(raw) else {
            return Err(Error::UnreadableArchive { id: id.to_owned() });
        };

        let folder = self.template_folder(id);
        if let Err(source) = self.populate(id, raw, encoding, &folder, hash) {
            self.cleanup_folder(&folder);
            return Err(Error::Processing {
                id: id.to_owned(),
                source,
            });
        }
        Ok(())
    }

    /// The compensated write sequence: recreate, register, sidecar, extract.
    fn populate(
        &self,
        id: &str,
        raw: &[u8],
        encoding: EntryEncoding,
        folder: &Location,
        hash: Option<&str>,
    ) -> std::result::Result<(), StepError> {
        if self.repo.exists(folder)? {
            self.repo.delete(folder)?;
        }
        self.repo.make_folders(folder)?;

        self.registrar
            .register(id)
            .map_err(|source| StepError::Registrar {
                name: self.registrar.name(),
                source,
            })?;

        if let Some(hash) = hash.filter(|hash| !hash.trim().is_empty()) {
            self.write_hash(folder, hash, encoding)?;
        }

        let summary = extract_into(raw, encoding, folder, &self.repo)?;
        debug!(
            template = id,
            files = summary.files,
            folders = summary.folders,
            skipped = summary.skipped,
            "template saved"
        );
        Ok(())
    }

    fn write_hash(
        &self,
        folder: &Location,
        hash: &str,
        encoding: EntryEncoding,
    ) -> std::result::Result<(), StepError> {
        let location = folder.join(&self.options.hash_file_name);
        let payload = encoding.encode(hash);
        if self.repo.exists(&location)? {
            self.repo.set_content(&location, &payload)?;
        } else {
            self.repo.create(&location, &payload)?;
        }
        Ok(())
    }

    /// Best-effort rollback; never raises past the original error.
    fn cleanup_folder(&self, folder: &Location) {
        let result = self.repo.exists(folder).and_then(|exists| {
            if exists {
                self.repo.delete(folder)
            } else {
                Ok(())
            }
        });
        if let Err(error) = result {
            warn!(%folder, %error, "template folder cleanup failed");
        }
    }

    /// Stored integrity hash for `id`; `Ok(None)` when no sidecar exists.
    /// An existing but unreadable sidecar is a processing failure, not
    /// "not set".
    pub fn read_hash(&self, id: &str) -> Result<Option<String>> {
        let id = validate_template_id(id)?;
        let location = self.template_folder(id).join(&self.options.hash_file_name);

        if !self
            .repo
            .exists(&location)
            .map_err(|source| Self::processing(id, source))?
        {
            return Ok(None);
        }

        let mut bytes = Vec::new();
        self.repo
            .get_content(&location)
            .map_err(|source| Self::processing(id, source))?
            .read_to_end(&mut bytes)
            .map_err(|source| Self::processing(id, source))?;

        Ok(Some(String::from_utf8_lossy(&bytes).trim().to_owned()))
    }

    /// Export template `id` as ZIP bytes.
    ///
    /// The hash sidecar is metadata, not part of the template's file tree,
    /// and is left out of the archive.
    pub fn download(&self, id: &str) -> Result<Vec<u8>> {
        let id = validate_template_id(id)?;
        let folder = self.template_folder(id);
        let hash_file = self.options.hash_file_name.clone();
        self.export(id, &folder, move |relative| relative != hash_file)
    }

    /// Export a whole project subtree as ZIP bytes.
    ///
    /// Project identifiers address the store root directly, so both the id
    /// and the optional group are held to a stricter character rule than
    /// template ids.
    pub fn download_project(&self, project_id: &str, group: Option<&str>) -> Result<Vec<u8>> {
        let project_id = validate_project_segment(project_id)?;
        let mut subtree = Location::root();
        if let Some(group) = group {
            subtree = subtree.join(validate_project_segment(group)?);
        }
        let subtree = subtree.join(project_id);
        self.export(project_id, &subtree, |_| true)
    }

    fn export(
        &self,
        id: &str,
        subtree: &Location,
        keep: impl Fn(&str) -> bool,
    ) -> Result<Vec<u8>> {
        if !self
            .repo
            .is_folder(subtree)
            .map_err(|source| Self::processing(id, source))?
        {
            return Err(Error::NotFound { id: id.to_owned() });
        }
        build_archive_filtered(&self.repo, subtree, Cursor::new(Vec::new()), keep)
            .map(Cursor::into_inner)
            .map_err(|source| Self::processing(id, source))
    }
}

fn validate_template_id(id: &str) -> Result<&str> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidIdentifier {
            reason: "identifier must not be blank",
        });
    }
    Ok(trimmed)
}

fn validate_project_segment(segment: &str) -> Result<&str> {
    let trimmed = validate_template_id(segment)?;
    if trimmed.contains("..") || trimmed.contains('/') || trimmed.contains('\\') {
        return Err(Error::InvalidIdentifier {
            reason: "identifier contains path characters",
        });
    }
    Ok(trimmed)
}
