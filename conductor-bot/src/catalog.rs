//! # Menu catalog
//!
//! Immutable table of menu nodes keyed by button identifier. The built-in catalog ships as
//! `menu/catalog.json`; `MENU_CATALOG_PATH` replaces it with a file of the same shape.
//! Every catalog is validated on load: each child button resolves to a node, reserved ids are
//! not redefined, node ids are unique.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;

use conductor_core::{BotError, Button, Result};
use serde::Deserialize;
use tracing::{debug, info};

/// Id of the top-level menu (the `/start` screen).
pub const ROOT_ID: &str = "root";
/// Reserved callback id of the "back to main menu" button; always renders the root.
pub const BACK_TO_MENU_ID: &str = "back_to_menu";

const BUILTIN_CATALOG: &str = include_str!("../menu/catalog.json");

/// One static menu entry: Markdown text plus ordered child buttons.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MenuNode {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub buttons: Vec<Button>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    back_label: String,
    help_text: String,
    root: MenuNode,
    #[serde(default)]
    nodes: Vec<MenuNode>,
}

#[derive(Debug, Clone)]
pub struct MenuCatalog {
    root: MenuNode,
    nodes: HashMap<String, MenuNode>,
    help_text: String,
    back_label: String,
}

impl MenuCatalog {
    /// The catalog compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parses and validates a catalog document.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)
            .map_err(|e| BotError::Config(format!("Invalid menu catalog: {}", e)))?;

        let mut nodes = HashMap::with_capacity(file.nodes.len());
        for node in file.nodes {
            if node.id == ROOT_ID || node.id == BACK_TO_MENU_ID {
                return Err(BotError::Config(format!(
                    "Menu catalog redefines reserved id '{}'",
                    node.id
                )));
            }
            if nodes.contains_key(&node.id) {
                return Err(BotError::Config(format!(
                    "Menu catalog defines '{}' twice",
                    node.id
                )));
            }
            nodes.insert(node.id.clone(), node);
        }

        let catalog = Self {
            root: file.root,
            nodes,
            help_text: file.help_text,
            back_label: file.back_label,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Loads from `path` when given, otherwise the built-in catalog.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let json = std::fs::read_to_string(path)?;
                let catalog = Self::from_json(&json)?;
                info!(path = %path.display(), nodes = catalog.len(), "Loaded menu catalog");
                Ok(catalog)
            }
            None => {
                let catalog = Self::builtin()?;
                debug!(nodes = catalog.len(), "Using built-in menu catalog");
                Ok(catalog)
            }
        }
    }

    /// Checks that the root is named correctly and that every child button resolves.
    pub fn validate(&self) -> Result<()> {
        if self.root.id != ROOT_ID {
            return Err(BotError::Config(format!(
                "Menu catalog root must have id '{}', got '{}'",
                ROOT_ID, self.root.id
            )));
        }
        for node in std::iter::once(&self.root).chain(self.nodes.values()) {
            for button in &node.buttons {
                if self.get(&button.data).is_none() {
                    return Err(BotError::Config(format!(
                        "Button '{}' in node '{}' points to unknown node '{}'",
                        button.label, node.id, button.data
                    )));
                }
            }
        }
        Ok(())
    }

    /// Resolves a button id. `root` and `back_to_menu` both resolve to the root node.
    pub fn get(&self, id: &str) -> Option<&MenuNode> {
        match id {
            ROOT_ID | BACK_TO_MENU_ID => Some(&self.root),
            _ => self.nodes.get(id),
        }
    }

    pub fn root(&self) -> &MenuNode {
        &self.root
    }

    pub fn help_text(&self) -> &str {
        &self.help_text
    }

    pub fn back_label(&self) -> &str {
        &self.back_label
    }

    /// Number of non-root nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ids of every non-root node reachable from the root, breadth first.
    pub fn reachable_ids(&self) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut order = Vec::new();
        let mut queue: VecDeque<&MenuNode> = VecDeque::from([&self.root]);
        while let Some(node) = queue.pop_front() {
            for button in &node.buttons {
                let id = button.data.as_str();
                if id == ROOT_ID || id == BACK_TO_MENU_ID || !seen.insert(id) {
                    continue;
                }
                if let Some(child) = self.nodes.get(id) {
                    order.push(id.to_string());
                    queue.push_back(child);
                }
            }
        }
        order
    }
}
