/// What happened during one `install` invocation.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InstallReport {
    /// `name@version` of every package extracted, in completion order.
    pub installed: Vec<String>,
    /// Packages that failed; unresolved ones carry only their name.
    pub failed: Vec<String>,
    /// `name@version` of every repeat cut from a dependency cycle.
    pub skipped: Vec<String>,
}

impl InstallReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_installed(&mut self, name: &str, version: &str) {
        self.installed.push(format!("{}@{}", name, version));
    }

    pub fn record_failed(&mut self, name: &str, version: &str) {
        self.failed.push(format!("{}@{}", name, version));
    }

    pub fn record_cycle(&mut self, name: &str, version: &str) {
        self.skipped.push(format!("{}@{}", name, version));
    }

    pub fn record_unresolved(&mut self, name: &str) {
        self.failed.push(name.to_string());
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "installed {} package(s), {} failed",
            self.installed.len(),
            self.failed.len()
        );
        if !self.skipped.is_empty() {
            summary.push_str(&format!(", {} skipped (cycle)", self.skipped.len()));
        }
        summary
    }

    pub fn print(&self) {
        println!("{}", self.summary());
        for failed in &self.failed {
            println!("  failed: {}", failed);
        }
        for skipped in &self.skipped {
            println!("  skipped (cycle): {}", skipped);
        }
    }
}
