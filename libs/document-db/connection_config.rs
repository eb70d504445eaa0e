use typed_builder::TypedBuilder;

use crate::{
    document_parser::{DocumentParser, JsonParser},
    SchemaRegistry,
};

#[derive(TypedBuilder)]
pub struct ConnectionConfig {
    #[builder(setter(into))]
    pub connection_string: String,
    #[builder(default = JsonParser::get())]
    pub document_parser: DocumentParser,
    #[builder(default = SchemaRegistry::builtin())]
    pub schemas: SchemaRegistry,
}
