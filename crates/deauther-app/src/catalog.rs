//! Screens and menu applications.
//!
//! A catalog maps screen ids to text lines and lists the menu applications.
//! The built-in catalog is compiled in; hosts may load another from disk.

use std::{
    collections::{BTreeMap, HashSet},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{CatalogError, EngineError, MenuSpec};

const BUILTIN: &str = include_str!("../assets/catalog.json");

/// Screens and application menus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    screens: BTreeMap<String, Vec<String>>,
    apps: Vec<MenuSpec>,
}

impl Catalog {
    /// The compiled-in catalog.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN)
    }

    /// Parse and validate a catalog.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(raw)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Read a catalog file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|source| CatalogError::Io { path: path.to_path_buf(), source })?;
        Self::from_json(&raw)
    }

    /// Build a catalog from parts.
    pub fn new(
        screens: BTreeMap<String, Vec<String>>,
        apps: Vec<MenuSpec>,
    ) -> Result<Self, CatalogError> {
        let catalog = Self { screens, apps };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Lines of a screen.
    ///
    /// # Errors
    ///
    /// [`EngineError::MissingScreen`] if no screen has this id.
    pub fn screen(&self, id: &str) -> Result<&[String], EngineError> {
        self.try_screen(id).ok_or_else(|| EngineError::MissingScreen(id.to_string()))
    }

    /// Lines of a screen, if present.
    pub fn try_screen(&self, id: &str) -> Option<&[String]> {
        self.screens.get(id).map(Vec::as_slice)
    }

    /// Application by name, ignoring case.
    pub fn app(&self, name: &str) -> Option<&MenuSpec> {
        self.apps.iter().find(|app| app.name.eq_ignore_ascii_case(name))
    }

    /// All applications, in catalog order.
    pub fn apps(&self) -> &[MenuSpec] {
        &self.apps
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut names = HashSet::new();
        for app in &self.apps {
            let name = app.name.trim();
            if name.is_empty() || name.contains(char::is_whitespace) {
                return Err(CatalogError::Invalid(format!("bad application name {:?}", app.name)));
            }
            if !names.insert(name.to_ascii_lowercase()) {
                return Err(CatalogError::Invalid(format!("duplicate application {name}")));
            }
            if app.options.is_empty() {
                return Err(CatalogError::Invalid(format!("{name}: no options")));
            }
            if let Some(token) = &app.quit_token
                && (token.is_empty() || token.bytes().all(|b| b.is_ascii_digit()))
            {
                return Err(CatalogError::Invalid(format!("{name}: bad quit token {token:?}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use deauther_core::{CommandKind, StatusFlag};

    use super::*;

    #[test]
    fn builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();

        let deauth = catalog.app("DEAUTH").unwrap();
        assert_eq!(deauth.options.len(), 3);
        assert_eq!(deauth.quit_token.as_deref(), Some("q"));
        assert_eq!(deauth.options[1].command, CommandKind::Whitelist);

        let recon = catalog.app("recon").unwrap();
        assert_eq!(recon.options.len(), 2);
        assert!(recon.quit_token.is_none());
        assert_eq!(recon.options[0].then, Some(CommandKind::StopAttack));
    }

    #[test]
    fn builtin_screens_resolve() {
        let catalog = Catalog::builtin().unwrap();
        for app in catalog.apps() {
            assert!(catalog.screen(&app.banner).is_ok(), "{} banner", app.name);
            for id in &app.boot {
                assert!(catalog.screen(id).is_ok(), "{} boot {id}", app.name);
            }
        }
    }

    #[test]
    fn scan_phases_wait_in_lifecycle_order() {
        let catalog = Catalog::builtin().unwrap();
        let scan = &catalog.app("deauth").unwrap().options[0];
        let flags: Vec<_> = scan.phases.iter().map(|p| p.flag).collect();
        assert_eq!(flags, StatusFlag::ALL);
        assert!(scan.phases[2].only_if_raised);
    }

    #[test]
    fn missing_screen_is_an_error() {
        let catalog = Catalog::builtin().unwrap();
        assert!(matches!(catalog.screen("nope"), Err(EngineError::MissingScreen(id)) if id == "nope"));
    }

    #[test]
    fn rejects_numeric_quit_token() {
        let raw = r#"{
            "apps": [{
                "name": "x",
                "banner": "b",
                "options": [{ "label": "Scan", "command": "scan" }],
                "quit_token": "1"
            }]
        }"#;
        assert!(matches!(Catalog::from_json(raw), Err(CatalogError::Invalid(_))));
    }

    #[test]
    fn rejects_duplicate_names() {
        let raw = r#"{
            "apps": [
                { "name": "a", "banner": "b", "options": [{ "label": "S", "command": "scan" }] },
                { "name": "A", "banner": "b", "options": [{ "label": "S", "command": "scan" }] }
            ]
        }"#;
        assert!(matches!(Catalog::from_json(raw), Err(CatalogError::Invalid(_))));
    }

    #[test]
    fn rejects_unknown_command() {
        let raw = r#"{
            "apps": [{ "name": "a", "banner": "b", "options": [{ "label": "S", "command": "nuke" }] }]
        }"#;
        assert!(matches!(Catalog::from_json(raw), Err(CatalogError::Parse(_))));
    }
}
