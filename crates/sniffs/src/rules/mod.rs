mod lowercase_type_declaration;
pub mod type_registry;

pub use lowercase_type_declaration::{LowerCaseTypeDeclaration, TypeCaseMismatch, TypeContext};
