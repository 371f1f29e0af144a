//! Built-in registry used when no manifest can be loaded

use crate::resolver::DependencyMap;

use super::manifest::{Manifest, ModpackCategory, ModpackEntry};

/// Default manifest location.
pub const MANIFEST_URL: &str =
    "https://raw.githubusercontent.com/Dimserene/ModpackManager/main/information.json";

const MODPACKS: &[(&str, &str, &str)] = &[
    (
        "Dimserenes-Modpack",
        "https://github.com/Dimserene/Dimserenes-Modpack.git",
        "The full pack with every mod",
    ),
    (
        "Fine-tuned-Pack",
        "https://github.com/Dimserene/Fine-tuned-Pack.git",
        "A curated subset of the full pack",
    ),
    (
        "Vanilla-Plus-Pack",
        "https://github.com/Dimserene/Vanilla-Plus-Pack.git",
        "Light additions that keep the vanilla feel",
    ),
];

const DEPENDENCIES: &[(&str, &[&str])] = &[
    ("Cryptid", &["Talisman"]),
    ("ModpackDecks", &["SDM_0-s-Stuff"]),
    ("Jestobiology", &["Fusion-Jokers"]),
    ("Vultbines_Joker", &["Fusion-Jokers"]),
    ("Tsunami", &["Fusion-Jokers"]),
    ("AntonosStakes", &["Talisman"]),
    ("Bmjokers", &["Bmwallet"]),
    ("Oiiman-s-Additions", &["Cryptid", "Talisman"]),
];

/// The built-in dependency map.
pub fn builtin_dependencies() -> DependencyMap {
    DEPENDENCIES
        .iter()
        .map(|(dependent, required)| {
            (
                (*dependent).to_string(),
                required.iter().map(|r| (*r).to_string()).collect(),
            )
        })
        .collect()
}

/// The built-in manifest: the official packs and the built-in dependency map.
pub fn builtin_manifest() -> Manifest {
    let modpacks = MODPACKS
        .iter()
        .map(|(name, url, description)| ModpackEntry {
            name: (*name).to_string(),
            url: (*url).to_string(),
            description: (*description).to_string(),
            branches: None,
        })
        .collect();

    Manifest {
        modpack_categories: vec![ModpackCategory {
            category: "Dimserene".to_string(),
            modpacks,
        }],
        dependencies: Some(builtin_dependencies()),
        ..Manifest::default()
    }
}
