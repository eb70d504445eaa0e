use std::{
    io::Write,
    path::{Path, PathBuf},
};

use lazy_regex::Regex;
use tracing::{instrument, trace};

use crate::{
    document_parser::DocumentParser, utils::files, Document, IStorageBackend, StoreError,
    StoreResult,
};

/// Stores each collection as a directory of the database directory and each
/// document as a file named after its identifier.
///
/// Identifiers handed out by a connection are increasing, listing the files
/// by name gives back the insertion order.
pub struct FileBackend {
    database_path: PathBuf,
    document_parser: DocumentParser,
    document_regex: Regex,
}

impl FileBackend {
    pub fn open(database_path: PathBuf, document_parser: DocumentParser) -> StoreResult<Self> {
        std::fs::create_dir_all(&database_path)?;

        let extension = document_parser.file_extension();
        let document_regex = Regex::new(&format!(r"^[0-9A-HJKMNP-TV-Z]{{26}}\.{extension}$"))
            .map_err(StoreError::operation_failed)?;

        Ok(Self {
            database_path,
            document_parser,
            document_regex,
        })
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.database_path.join(collection)
    }

    fn read_document(&self, path: &Path) -> StoreResult<Document> {
        let contents = std::fs::read_to_string(path)?;
        let data = self
            .document_parser
            .deserialize(&contents)
            .map_err(StoreError::corrupted_document)?;
        Document::from_json(data)
    }
}

impl IStorageBackend for FileBackend {
    #[instrument(skip(self, document))]
    fn insert(&self, collection: &str, document: &Document) -> StoreResult<()> {
        trace!("Saving document");
        let id = document
            .id()
            .ok_or_else(|| StoreError::operation_failed("document has no identifier"))?;

        let collection_path = self.collection_path(collection);
        std::fs::create_dir_all(&collection_path)?;

        let mut path = collection_path.join(id.to_string());
        files::add_file_extension(&mut path, self.document_parser.file_extension());

        let serialized = self
            .document_parser
            .serialize(document)
            .map_err(StoreError::corrupted_document)?;

        // The document only becomes visible once the temporary file is renamed
        let mut file = tempfile::NamedTempFile::new_in(&collection_path)?;
        file.write_all(serialized.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&path).map_err(|e| StoreError::IoError(e.error))?;
        Ok(())
    }

    #[instrument(skip(self))]
    fn scan(&self, collection: &str) -> StoreResult<Vec<Document>> {
        trace!("Scan collection");
        let collection_path = self.collection_path(collection);
        if !collection_path.exists() {
            return Ok(Vec::new());
        }

        files::find_matching_files(&collection_path, &self.document_regex)?
            .into_iter()
            .map(|file_name| {
                let document = self.read_document(&collection_path.join(&file_name))?;
                match document.id() {
                    Some(id) if id.to_string() == files::file_stem(&file_name) => Ok(document),
                    _ => Err(StoreError::corrupted_document(format!(
                        "identifier of {file_name} does not match its file name"
                    ))),
                }
            })
            .collect()
    }

    #[instrument(skip(self))]
    fn drop_collection(&self, collection: &str) -> StoreResult<()> {
        trace!("Drop collection");
        remove_dir_if_exists(&self.collection_path(collection))
    }

    #[instrument(skip(self))]
    fn drop_database(&self) -> StoreResult<()> {
        trace!("Drop database");
        remove_dir_if_exists(&self.database_path)?;
        std::fs::create_dir_all(&self.database_path)?;
        Ok(())
    }
}

fn remove_dir_if_exists(path: &Path) -> StoreResult<()> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
