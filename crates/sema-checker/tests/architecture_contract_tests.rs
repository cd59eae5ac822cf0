//! Guards the `TypeRegistry` identity invariant the checker core leans on everywhere:
//! `Type::Struct`/`Type::Union` only ever get constructed inside `sema-types`'s own
//! `registry.rs`, through `register_struct_instance`/`register_union_instance`. Any
//! other call site building one directly risks re-deriving a `TypeId` that doesn't
//! match the one the name was actually registered under (`Type::Struct(k)` and
//! `Type::Union(k)` with an identical `NominalKey` intern to different `TypeId`s) — the
//! exact shape of bug `resolve_type_expr_readonly` used to have before it started
//! consulting `named_types` first.

use std::fs;
use std::path::Path;

fn is_rs_source_file(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("rs")
}

fn collect_rs_files_recursive(dir: &Path, files: &mut Vec<std::path::PathBuf>) {
    let entries = fs::read_dir(dir).unwrap_or_else(|_| panic!("failed to read {}", dir.display()));
    for entry in entries {
        let entry = entry.expect("failed to read directory entry");
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files_recursive(&path, files);
            continue;
        }
        if is_rs_source_file(&path) {
            files.push(path);
        }
    }
}

#[test]
fn nominal_type_construction_is_quarantined_to_sema_types_registry() {
    let workspace_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..");
    let mut source_files = Vec::new();
    for crate_dir in ["sema-types", "sema-checker", "sema-ast"] {
        collect_rs_files_recursive(&workspace_root.join("crates").join(crate_dir).join("src"), &mut source_files);
    }

    let mut violations = Vec::new();
    for path in &source_files {
        if path.ends_with("sema-types/src/registry.rs") {
            continue;
        }
        let source = fs::read_to_string(path).unwrap_or_else(|_| panic!("failed to read {}", path.display()));
        // Every `#[cfg(test)] mod tests { ... }` in this codebase is the last item in
        // its file (observed convention across sema-*'s src/ files), so everything
        // from its opening line onward is test-only and out of scope for this check.
        let body = match source.find("\nmod tests") {
            Some(idx) => &source[..idx],
            None => &source[..],
        };
        for (line_index, line) in body.lines().enumerate() {
            let trimmed = line.trim_start();
            if trimmed.starts_with("//") {
                continue;
            }
            if line.contains(".intern(Type::Struct(") || line.contains(".intern(Type::Union(") {
                violations.push(format!("{}:{}", path.display(), line_index + 1));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "Type::Struct/Type::Union should only be constructed in sema-types's registry.rs; violations: {}",
        violations.join(", ")
    );
}
