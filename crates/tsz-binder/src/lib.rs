//! TypeScript name binder for the tsz compiler.
//!
//! This crate provides:
//! - `BinderState` - Name resolution and symbol table construction
//! - `SymbolTable` - Symbol storage and lookup
//! - Lib file loading for built-in type definitions
//! - Import/export tracking
