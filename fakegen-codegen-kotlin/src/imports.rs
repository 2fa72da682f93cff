//! Kotlin import statements for a generated file.

use fakegen_codegen::generation::ImportCollector;

/// Packages every Kotlin file imports implicitly.
pub const DEFAULT_IMPORTS: &[&str] = &[
    "kotlin",
    "kotlin.annotation",
    "kotlin.collections",
    "kotlin.comparisons",
    "kotlin.io",
    "kotlin.jvm",
    "kotlin.ranges",
    "kotlin.sequences",
    "kotlin.text",
];

/// Whether symbols of `package` need an import in a file of `file_package`.
pub fn needs_import(package: &str, file_package: &str) -> bool {
    !package.is_empty() && package != file_package && !DEFAULT_IMPORTS.contains(&package)
}

/// Sorted import statements for a file in `file_package`.
pub fn import_statements(imports: &ImportCollector, file_package: &str) -> Vec<String> {
    let mut imports = imports.clone();
    imports.retain_packages(|package| needs_import(package, file_package));
    let mut statements: Vec<String> = imports.statements().collect();
    statements.sort();
    statements.dedup();
    statements
}
