//! Settings file management (`config.json`)

use crate::domain::UnitSystem;
use crate::error::{CodexError, Result};
use crate::infrastructure::home::CodexHome;
use crate::infrastructure::store::{quarantine, write_atomic};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::str::FromStr;
use tracing::{info, warn};

pub const CURRENCIES: [&str; 4] = ["CAD", "USD", "EUR", "GBP"];
pub const DEFAULT_PORT: u16 = 8501;

/// Symbol printed before amounts in `currency`
pub fn currency_symbol(currency: &str) -> &'static str {
    match currency {
        "EUR" => "€",
        "GBP" => "£",
        _ => "$",
    }
}

fn crate_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSection {
    pub name: String,
    /// Always the running binary's version
    #[serde(skip_deserializing)]
    pub version: String,
    pub theme: String,
}

impl Default for AppSection {
    fn default() -> Self {
        AppSection {
            name: "Codex".to_string(),
            version: crate_version(),
            theme: "notebook".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSection {
    pub name: String,
    pub timezone: String,
    pub currency: String,
    pub units: UnitSystem,
}

impl Default for UserSection {
    fn default() -> Self {
        UserSection {
            name: "Friend".to_string(),
            timezone: "America/Toronto".to_string(),
            currency: "CAD".to_string(),
            units: UnitSystem::Imperial,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        ServerSection {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinanceModule {
    pub enabled: bool,
    pub default_currency: String,
}

impl Default for FinanceModule {
    fn default() -> Self {
        FinanceModule {
            enabled: true,
            default_currency: "CAD".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarpentryModule {
    pub enabled: bool,
    pub default_units: UnitSystem,
    /// Default waste multiplier, 1.0..=1.3
    pub waste_factor: f64,
}

impl Default for CarpentryModule {
    fn default() -> Self {
        CarpentryModule {
            enabled: true,
            default_units: UnitSystem::Imperial,
            waste_factor: 1.10,
        }
    }
}

impl CarpentryModule {
    /// Default waste as a whole percentage for the form sliders
    pub fn default_waste_percent(&self) -> u32 {
        ((self.waste_factor - 1.0) * 100.0).round().clamp(0.0, 30.0) as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhilosophyModule {
    pub enabled: bool,
    pub daily_reflection_reminder: bool,
}

impl Default for PhilosophyModule {
    fn default() -> Self {
        PhilosophyModule {
            enabled: true,
            daily_reflection_reminder: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModulesSection {
    pub finance: FinanceModule,
    pub carpentry: CarpentryModule,
    pub philosophy: PhilosophyModule,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    pub date_format: String,
    pub time_format: String,
    pub entries_per_page: usize,
}

impl Default for DisplaySection {
    fn default() -> Self {
        DisplaySection {
            date_format: "%B %d, %Y".to_string(),
            time_format: "%I:%M %p".to_string(),
            entries_per_page: 10,
        }
    }
}

/// The three feature areas of the notebook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Module {
    Finance,
    Carpentry,
    Philosophy,
}

impl Module {
    pub const ALL: [Module; 3] = [Module::Finance, Module::Carpentry, Module::Philosophy];

    pub fn key(&self) -> &'static str {
        match self {
            Module::Finance => "finance",
            Module::Carpentry => "carpentry",
            Module::Philosophy => "philosophy",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Module::Finance => "Finance",
            Module::Carpentry => "Carpentry",
            Module::Philosophy => "Philosophy",
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Module {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Module::ALL
            .iter()
            .find(|m| m.key() == s.trim().to_lowercase())
            .copied()
            .ok_or_else(|| format!("Unknown module: {}", s))
    }
}

/// User-editable settings. Missing keys fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: AppSection,
    pub user: UserSection,
    pub server: ServerSection,
    pub modules: ModulesSection,
    pub display: DisplaySection,
}

impl Settings {
    /// Load settings from `config.json` in the home directory
    pub fn load_from(home: &CodexHome) -> Result<Self> {
        let settings = Self::read_from(home)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse `config.json` without checking values, so a file holding one
    /// bad value can still be inspected and corrected key by key
    pub fn read_from(home: &CodexHome) -> Result<Self> {
        let path = home.config_path();
        let contents = fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CodexError::NotInitialized(home.root.clone())
            } else {
                CodexError::Io(e)
            }
        })?;

        serde_json::from_str(&contents)
            .map_err(|e| CodexError::Config(format!("Failed to parse config.json: {}", e)))
    }

    /// Load settings, creating the file with defaults when it is missing.
    ///
    /// Out-of-range values fall back to their defaults one key at a time;
    /// only a file that cannot be parsed at all is replaced wholesale.
    pub fn load_or_create(home: &CodexHome) -> Result<Self> {
        match Self::read_from(home) {
            Ok(mut settings) => {
                let repaired = settings.repair();
                if !repaired.is_empty() {
                    warn!(keys = ?repaired, "invalid settings restored to defaults");
                    settings.save_to(home)?;
                }
                Ok(settings)
            }
            Err(CodexError::NotInitialized(_)) => {
                info!(path = %home.config_path().display(), "creating default settings");
                let settings = Settings::default();
                settings.save_to(home)?;
                Ok(settings)
            }
            Err(CodexError::Config(msg)) => {
                warn!(error = %msg, "settings unreadable, restoring defaults");
                quarantine(&home.config_path())?;
                let settings = Settings::default();
                settings.save_to(home)?;
                Ok(settings)
            }
            Err(e) => Err(e),
        }
    }

    pub fn save_to(&self, home: &CodexHome) -> Result<()> {
        let contents = self.to_json()?;
        write_atomic(&home.config_path(), &contents)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        match self.problems().into_iter().next() {
            Some((_, msg)) => Err(CodexError::Config(msg)),
            None => Ok(()),
        }
    }

    /// Reset every invalid value to its default. Returns the keys touched.
    pub fn repair(&mut self) -> Vec<&'static str> {
        let defaults = Settings::default();
        let keys: Vec<&'static str> = self.problems().into_iter().map(|(key, _)| key).collect();
        for key in &keys {
            match *key {
                "user.currency" => self.user.currency = defaults.user.currency.clone(),
                "modules.finance.default_currency" => {
                    self.modules.finance.default_currency =
                        defaults.modules.finance.default_currency.clone()
                }
                "user.name" => self.user.name = defaults.user.name.clone(),
                "modules.carpentry.waste_factor" => {
                    self.modules.carpentry.waste_factor = defaults.modules.carpentry.waste_factor
                }
                "display.entries_per_page" => {
                    self.display.entries_per_page = defaults.display.entries_per_page
                }
                _ => {}
            }
        }
        keys
    }

    /// Invalid values as (dot path, message) pairs
    fn problems(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();

        for (key, currency) in [
            ("user.currency", &self.user.currency),
            (
                "modules.finance.default_currency",
                &self.modules.finance.default_currency,
            ),
        ] {
            if !CURRENCIES.contains(&currency.as_str()) {
                out.push((
                    key,
                    format!(
                        "Invalid currency for {}: {}. Valid: {}",
                        key,
                        currency,
                        CURRENCIES.join(", ")
                    ),
                ));
            }
        }

        if self.user.name.trim().is_empty() {
            out.push(("user.name", "user.name cannot be empty".to_string()));
        }

        let waste = self.modules.carpentry.waste_factor;
        if !(1.0..=1.3).contains(&waste) {
            out.push((
                "modules.carpentry.waste_factor",
                format!(
                    "Invalid modules.carpentry.waste_factor: {}. Expected 1.0 to 1.3",
                    waste
                ),
            ));
        }

        if self.display.entries_per_page == 0 {
            out.push((
                "display.entries_per_page",
                "display.entries_per_page must be at least 1".to_string(),
            ));
        }

        out
    }

    pub fn is_enabled(&self, module: Module) -> bool {
        match module {
            Module::Finance => self.modules.finance.enabled,
            Module::Carpentry => self.modules.carpentry.enabled,
            Module::Philosophy => self.modules.philosophy.enabled,
        }
    }

    pub fn set_enabled(&mut self, module: Module, enabled: bool) {
        match module {
            Module::Finance => self.modules.finance.enabled = enabled,
            Module::Carpentry => self.modules.carpentry.enabled = enabled,
            Module::Philosophy => self.modules.philosophy.enabled = enabled,
        }
    }

    pub fn require_enabled(&self, module: Module) -> Result<()> {
        if self.is_enabled(module) {
            Ok(())
        } else {
            Err(CodexError::ModuleDisabled(module.key().to_string()))
        }
    }

    /// Get a value by dot path, e.g. `user.currency`
    pub fn get(&self, key: &str) -> Result<String> {
        let value = serde_json::to_value(self)?;
        match lookup(&value, key) {
            Some(Value::Object(_)) => Err(section_error(key)),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Ok(other.to_string()),
            None => Err(unknown_key(key)),
        }
    }

    /// Set a value by dot path. The new value itself must be valid; problems
    /// elsewhere in the file do not block the change.
    pub fn set(&mut self, key: &str, raw: &str) -> Result<()> {
        if key == "app.version" {
            return Err(CodexError::Config(
                "Cannot modify 'app.version' (read-only)".to_string(),
            ));
        }

        let mut value = serde_json::to_value(&*self)?;
        let slot = lookup_mut(&mut value, key).ok_or_else(|| unknown_key(key))?;
        *slot = coerce(slot, key, raw)?;

        let updated: Settings = serde_json::from_value(value)
            .map_err(|e| CodexError::Config(format!("Invalid value for {}: {}", key, e)))?;
        if let Some((_, msg)) = updated.problems().into_iter().find(|(k, _)| *k == key) {
            return Err(CodexError::Config(msg));
        }
        *self = updated;
        Ok(())
    }

    /// Every leaf value as (dot path, value) pairs, in file order
    pub fn entries(&self) -> Result<Vec<(String, String)>> {
        let value = serde_json::to_value(self)?;
        let mut out = Vec::new();
        flatten("", &value, &mut out);
        Ok(out)
    }
}

fn unknown_key(key: &str) -> CodexError {
    CodexError::Config(format!("Unknown config key: '{}'", key))
}

fn section_error(key: &str) -> CodexError {
    CodexError::Config(format!(
        "'{}' is a section; use a full key such as '{}.<name>'",
        key, key
    ))
}

fn lookup<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(value, |current, part| current.get(part))
}

fn lookup_mut<'a>(value: &'a mut Value, key: &str) -> Option<&'a mut Value> {
    key.split('.')
        .try_fold(value, |current, part| current.get_mut(part))
}

/// Interpret a raw string according to the type already stored at `slot`
fn coerce(slot: &Value, key: &str, raw: &str) -> Result<Value> {
    let raw = raw.trim();
    let invalid = || CodexError::Config(format!("Invalid value for {}: {}", key, raw));

    match slot {
        Value::Object(_) => Err(section_error(key)),
        Value::Bool(_) => raw.parse::<bool>().map(Value::Bool).map_err(|_| invalid()),
        Value::Number(n) if n.is_u64() => {
            raw.parse::<u64>().map(Value::from).map_err(|_| invalid())
        }
        Value::Number(_) => raw
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .ok_or_else(invalid),
        _ => Ok(Value::String(raw.to_string())),
    }
}

fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                let key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{}.{}", prefix, k)
                };
                flatten(&key, v, out);
            }
        }
        Value::String(s) => out.push((prefix.to_string(), s.clone())),
        other => out.push((prefix.to_string(), other.to_string())),
    }
}
