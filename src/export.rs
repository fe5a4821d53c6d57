//! ZIP export of selected translation files.

use std::collections::BTreeSet;
use std::fs::{
    self,
    File,
};
use std::io::Write;
use std::path::{
    Path,
    PathBuf,
};

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::HubError;
use crate::storage::TranslationStore;
use crate::types::LanguageRef;

/// Archive written when no output path is given, relative to the root.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "export.zip";

/// Packs translation files into a DEFLATE-compressed ZIP archive.
///
/// Entries keep the on-disk layout (`<language>/<namespace>`) and the original file bytes.
#[derive(Debug, Clone, Copy)]
pub struct ExportPackager<'a> {
    store: TranslationStore<'a>,
}

impl<'a> ExportPackager<'a> {
    #[must_use]
    pub const fn new(store: TranslationStore<'a>) -> Self {
        Self { store }
    }

    /// Writes the archive and returns its path.
    ///
    /// # Arguments
    /// * `languages` - real languages to include; unknown codes and the schema name are skipped
    /// * `namespaces` - namespaces to include; unknown names are skipped
    /// * `include_schema` - also add the schema file of every requested known namespace
    /// * `output` - archive path, `<root>/export.zip` when `None`
    ///
    /// Files that do not exist on disk are skipped silently.
    ///
    /// # Errors
    /// `Io` or `Zip` when the archive cannot be written.
    pub fn export(
        &self,
        languages: impl IntoIterator<Item = impl AsRef<str>>,
        namespaces: impl IntoIterator<Item = impl AsRef<str>>,
        include_schema: bool,
        output: Option<&Path>,
    ) -> Result<PathBuf, HubError> {
        let files = self.store.files();
        let index = self.store.index();
        let output = output
            .map_or_else(|| files.root().join(DEFAULT_EXPORT_FILE_NAME), Path::to_path_buf);

        let languages: BTreeSet<String> = languages
            .into_iter()
            .map(|code| code.as_ref().to_string())
            .filter(|code| code != files.schema_dir_name() && index.has_language(code))
            .collect();
        let namespaces: BTreeSet<String> = namespaces
            .into_iter()
            .map(|namespace| namespace.as_ref().to_string())
            .filter(|namespace| index.has_namespace(namespace))
            .collect();

        let mut entries: Vec<(String, PathBuf)> = Vec::new();
        for code in &languages {
            let language = LanguageRef::real(code.as_str());
            for namespace in &namespaces {
                if files.exists(&language, namespace) {
                    entries.push((format!("{code}/{namespace}"), files.path(&language, namespace)));
                }
            }
        }
        if include_schema {
            for namespace in &namespaces {
                if files.exists(&LanguageRef::Schema, namespace) {
                    entries.push((
                        format!("{}/{namespace}", files.schema_dir_name()),
                        files.path(&LanguageRef::Schema, namespace),
                    ));
                }
            }
        }

        let mut writer = ZipWriter::new(File::create(&output)?);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, path) in &entries {
            let bytes = fs::read(path)?;
            writer.start_file(name.as_str(), options)?;
            writer.write_all(&bytes)?;
        }
        writer.finish()?;

        tracing::info!(path = %output.display(), entries = entries.len(), "Exported translations");
        Ok(output)
    }
}
