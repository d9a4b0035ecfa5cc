pub mod excel;
pub mod faq;
pub mod file_processor;
