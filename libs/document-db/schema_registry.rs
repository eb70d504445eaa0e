use std::{collections::BTreeMap, path::Path, sync::Arc};

use lazy_regex::{regex_is_match, Regex};

use crate::{
    document_parser::DocumentParser, utils::files, CollectionSchema, FieldType, StoreError,
    StoreResult, ID_FIELD,
};

/// Collection name → schema, immutable once a connection is initialized
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, Arc<CollectionSchema>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schemas of the EduTask collections
    pub fn builtin() -> Self {
        Self::new()
            .register(
                CollectionSchema::new("task")
                    .required("title", FieldType::String)
                    .required("description", FieldType::String)
                    .optional("startdate", FieldType::Date)
                    .optional("duedate", FieldType::Date)
                    .optional("categories", FieldType::array_of(FieldType::String))
                    .optional(
                        "requires",
                        FieldType::array_of(FieldType::reference("task")),
                    )
                    .optional("todos", FieldType::array_of(FieldType::reference("todo")))
                    .optional("video", FieldType::reference("video")),
            )
            .register(
                CollectionSchema::new("user")
                    .required("firstName", FieldType::String)
                    .required("lastName", FieldType::String)
                    .required("email", FieldType::String)
                    .optional("tasks", FieldType::array_of(FieldType::reference("task"))),
            )
            .register(
                CollectionSchema::new("todo")
                    .required("description", FieldType::String)
                    .optional("done", FieldType::Bool),
            )
            .register(CollectionSchema::new("video").required("url", FieldType::String))
    }

    pub fn register(mut self, schema: CollectionSchema) -> Self {
        self.schemas.insert(schema.name.clone(), Arc::new(schema));
        self
    }

    pub fn get(&self, collection: &str) -> Option<Arc<CollectionSchema>> {
        self.schemas.get(collection).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Load one schema per file of `path`, the file stem is the collection name
    pub fn from_dir(path: &Path, document_parser: &DocumentParser) -> StoreResult<Self> {
        let extension = document_parser.file_extension();
        let re = Regex::new(&format!(r"^[A-Za-z0-9_\-]+\.{extension}$"))
            .map_err(StoreError::operation_failed)?;

        files::find_matching_files(path, &re)?
            .into_iter()
            .try_fold(Self::new(), |registry, file_name| -> StoreResult<Self> {
                let contents = std::fs::read_to_string(path.join(&file_name))?;
                let data = document_parser
                    .deserialize(&contents)
                    .map_err(|e| StoreError::invalid_schema(format!("{file_name}: {e}")))?;
                let mut schema: CollectionSchema = serde_json::from_value(data)
                    .map_err(|e| StoreError::invalid_schema(format!("{file_name}: {e}")))?;
                schema.name = files::file_stem(&file_name);
                Ok(registry.register(schema))
            })
    }

    /// Ensure every schema can be used: collection names are usable as
    /// directory names, `_id` is left to the store and references point to
    /// registered collections
    pub fn check(&self) -> StoreResult<()> {
        for (name, schema) in self.schemas.iter() {
            if !regex_is_match!(r"^[A-Za-z0-9_\-]+$", name) {
                return Err(StoreError::invalid_schema(format!(
                    "'{name}' is not a valid collection name"
                )));
            }

            if schema.fields.contains_key(ID_FIELD) {
                return Err(StoreError::invalid_schema(format!(
                    "collection '{name}' declares the reserved field '{ID_FIELD}'"
                )));
            }

            for (field, spec) in schema.fields.iter() {
                if let Some(target) = spec.field_type.referenced_collection() {
                    if !self.schemas.contains_key(target) {
                        return Err(StoreError::invalid_schema(format!(
                            "field '{field}' of collection '{name}' references unknown collection '{target}'"
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}
