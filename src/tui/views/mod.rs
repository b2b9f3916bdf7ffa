pub mod create_doc;
pub mod doc_list;
pub mod document;
pub mod panel;
