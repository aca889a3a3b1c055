// Upload flow: validate → store object → insert pending resume → extract text → analyze.

pub mod flow;
pub mod handlers;
pub mod text;
pub mod validation;
