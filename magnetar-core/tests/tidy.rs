//! Magnetar Style Consistency Enforcement
//!
//! Scans the workspace sources for the structural rules every crate follows:
//! bounded module size, domain-specific module names, documented public API
//! and `# Errors` sections on fallible public functions.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Upper bound on lines per source file.
const MAX_MODULE_LINES: usize = 600;

/// Catch-all module names that hide what a module is about.
const BANNED_MODULE_NAMES: &[&str] = &[
    "utils", "util", "helpers", "helper", "common", "shared", "misc", "tools",
];

/// Workspace crates whose sources are checked.
const WORKSPACE_CRATES: &[&str] = &[
    "magnetar-core",
    "magnetar-search",
    "magnetar-web",
    "magnetar-cli",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Severity {
    Critical,
    Warning,
}

#[derive(Debug, Clone)]
struct StyleViolation {
    severity: Severity,
    file: String,
    line: usize,
    rule: &'static str,
    message: String,
}

struct StyleChecker {
    violations: Vec<StyleViolation>,
    current_file: PathBuf,
    file_lines: Vec<String>,
}

impl StyleChecker {
    fn new() -> Self {
        Self {
            violations: Vec::new(),
            current_file: PathBuf::new(),
            file_lines: Vec::new(),
        }
    }

    fn check_file(&mut self, file_path: PathBuf) -> Result<(), std::io::Error> {
        let content = fs::read_to_string(&file_path)?;
        self.current_file = file_path;
        self.file_lines = content.lines().map(str::to_string).collect();

        self.check_module_size();
        self.check_banned_module_names();
        self.check_emoji_usage();
        self.check_error_documentation();
        self.check_public_documentation();

        Ok(())
    }

    fn add_violation(
        &mut self,
        severity: Severity,
        line: usize,
        rule: &'static str,
        message: String,
    ) {
        self.violations.push(StyleViolation {
            severity,
            file: self.current_file.to_string_lossy().to_string(),
            line,
            rule,
            message,
        });
    }

    fn check_module_size(&mut self) {
        let line_count = self.file_lines.len();
        if line_count > MAX_MODULE_LINES {
            self.add_violation(
                Severity::Critical,
                1,
                "MODULE_SIZE_LIMIT",
                format!("Module has {line_count} lines, exceeding {MAX_MODULE_LINES}"),
            );
        }
    }

    fn check_banned_module_names(&mut self) {
        let Some(name) = self.current_file.file_stem().and_then(|s| s.to_str()) else {
            return;
        };
        if BANNED_MODULE_NAMES.contains(&name) {
            let message = format!("Module '{name}' uses a catch-all name");
            self.add_violation(Severity::Critical, 1, "BANNED_MODULE_NAME", message);
        }
    }

    fn check_emoji_usage(&mut self) {
        let mut violations = Vec::new();
        for (line_num, line) in self.file_lines.iter().enumerate() {
            let has_emoji = line.chars().any(|ch| {
                let code_point = ch as u32;
                (0x1F600..=0x1F64F).contains(&code_point)
                    || (0x1F910..=0x1F96B).contains(&code_point)
                    || (0x1F970..=0x1F9FF).contains(&code_point)
            });
            if has_emoji {
                violations.push(line_num + 1);
            }
        }

        for line in violations {
            self.add_violation(
                Severity::Critical,
                line,
                "NO_EMOJIS",
                "Emoji in source".to_string(),
            );
        }
    }

    /// Every `pub fn` returning `Result` carries an `# Errors` section.
    fn check_error_documentation(&mut self) {
        let mut violations = Vec::new();
        let mut doc_lines: Vec<&str> = Vec::new();

        for (line_num, line) in self.file_lines.iter().enumerate() {
            let trimmed = line.trim_start();
            if trimmed.starts_with("///") {
                doc_lines.push(trimmed);
                continue;
            }
            if trimmed.starts_with("#[") {
                continue;
            }

            let is_public_fn =
                trimmed.starts_with("pub fn ") || trimmed.starts_with("pub async fn ");
            if is_public_fn && signature_returns_result(&self.file_lines[line_num..]) {
                let documented = doc_lines.iter().any(|doc| doc.contains("# Errors"));
                if !documented {
                    let name = function_name(trimmed).unwrap_or_default();
                    violations.push((
                        line_num + 1,
                        format!("Public function '{name}' returning Result lacks '# Errors'"),
                    ));
                }
            }
            doc_lines.clear();
        }

        for (line, message) in violations {
            self.add_violation(Severity::Critical, line, "MISSING_ERRORS_DOC", message);
        }
    }

    /// Public structs outside test code are documented.
    fn check_public_documentation(&mut self) {
        let mut has_doc = false;
        let mut violations = Vec::new();

        for (line_num, line) in self.file_lines.iter().enumerate() {
            let trimmed = line.trim_start();
            if trimmed.starts_with("///") {
                has_doc = true;
                continue;
            }
            if trimmed.starts_with("#[") {
                continue;
            }
            if trimmed.starts_with("pub struct ") && !has_doc {
                violations.push((
                    line_num + 1,
                    format!(
                        "Public struct '{}' missing documentation",
                        trimmed.trim_end()
                    ),
                ));
            }
            has_doc = false;
        }

        for (line, message) in violations {
            self.add_violation(Severity::Warning, line, "MISSING_PUBLIC_DOC", message);
        }
    }
}

/// Whether the signature starting at `lines[0]` returns a `Result`.
fn signature_returns_result(lines: &[String]) -> bool {
    for line in lines {
        if let Some((signature, _)) = line.split_once('{') {
            return signature.contains("Result<") || signature.contains("-> Result");
        }
        if line.contains("Result<") || line.contains("-> Result") {
            return true;
        }
        if line.trim_end().ends_with(';') {
            return false;
        }
    }
    false
}

fn function_name(line: &str) -> Option<String> {
    let after_fn = line.split("fn ").nth(1)?;
    let name: String = after_fn
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    (!name.is_empty()).then_some(name)
}

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".."))
}

/// Collect the library and binary sources of every workspace crate.
fn collect_workspace_files() -> Vec<PathBuf> {
    let root = workspace_root();
    let mut files = Vec::new();
    for crate_name in WORKSPACE_CRATES {
        let src_path = root.join(crate_name).join("src");
        if src_path.exists() {
            collect_rust_files_in_dir(&src_path, &mut files);
        }
    }
    files
}

fn collect_rust_files_in_dir(dir: &Path, files: &mut Vec<PathBuf>) {
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "rs") {
                files.push(path);
            } else if path.is_dir() {
                collect_rust_files_in_dir(&path, files);
            }
        }
    }
}

#[test]
fn enforce_magnetar_style_consistency() {
    let mut checker = StyleChecker::new();
    let mut file_count = 0;

    for file_path in collect_workspace_files() {
        if let Err(e) = checker.check_file(file_path.clone()) {
            eprintln!("Failed to check {}: {e}", file_path.display());
            continue;
        }
        file_count += 1;
    }
    assert!(file_count > 0, "no workspace sources found");

    checker.violations.sort_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then(a.file.cmp(&b.file))
            .then(a.line.cmp(&b.line))
    });

    let mut violations_by_rule: HashMap<&str, usize> = HashMap::new();
    let mut critical_violations = 0;
    for violation in &checker.violations {
        *violations_by_rule.entry(violation.rule).or_insert(0) += 1;
        if violation.severity == Severity::Critical {
            critical_violations += 1;
        }
        println!(
            "{:?} [{}] {}:{} - {}",
            violation.severity, violation.rule, violation.file, violation.line, violation.message
        );
    }

    println!("\n--- Magnetar Style Consistency Summary ---");
    println!("Files analyzed: {file_count}");
    println!("Total violations: {}", checker.violations.len());
    for (rule, count) in &violations_by_rule {
        println!("  {rule}: {count}");
    }

    assert_eq!(
        critical_violations, 0,
        "found {critical_violations} critical style violations"
    );
}

#[test]
fn signature_detection() {
    let lines: Vec<String> = [
        "pub fn new(",
        "    registry: Arc<ProviderRegistry>,",
        ") -> Result<Self, SearchError> {",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    assert!(signature_returns_result(&lines));

    let lines = vec!["pub fn len(&self) -> usize {".to_string()];
    assert!(!signature_returns_result(&lines));
    assert_eq!(
        function_name("pub async fn search("),
        Some("search".to_string())
    );
}
