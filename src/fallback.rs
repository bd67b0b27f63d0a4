//! Offline modpack suggestions used when the catalog cannot be consulted.

use craftcatalog_core::SearchResult;
use serde::Serialize;

/// First id handed to synthetic results. Real catalog ids stay below it.
pub const FALLBACK_ID_OFFSET: i64 = 1_000_000;

/// Author shown on every synthetic result.
pub const FALLBACK_AUTHOR: &str = "Community";

/// A well-known modpack suggested when the catalog is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub name: &'static str,
    pub description: &'static str,
    pub game_version: &'static str,
    pub mod_loader: &'static str,
    pub instructions: &'static str,
    pub estimated_size: &'static str,
    pub difficulty: &'static str,
}

const SUGGESTIONS: [Suggestion; 5] = [
    Suggestion {
        name: "All The Mods 9",
        description: "Kitchen sink modpack with tons of mods",
        game_version: "1.20.1",
        mod_loader: "Forge",
        instructions: "Visit CurseForge or ATLauncher to download",
        estimated_size: "~500MB",
        difficulty: "Advanced",
    },
    Suggestion {
        name: "FTB Skies",
        description: "Skyblock-style modpack with quests",
        game_version: "1.19.2",
        mod_loader: "Forge",
        instructions: "Available on FTB App or CurseForge",
        estimated_size: "~300MB",
        difficulty: "Intermediate",
    },
    Suggestion {
        name: "Better Minecraft",
        description: "Enhanced vanilla experience with performance mods",
        game_version: "1.20.1",
        mod_loader: "Fabric",
        instructions: "Download from CurseForge or Modrinth",
        estimated_size: "~200MB",
        difficulty: "Beginner",
    },
    Suggestion {
        name: "Create: Above and Beyond",
        description: "Tech modpack focused on Create mod",
        game_version: "1.16.5",
        mod_loader: "Forge",
        instructions: "Available on CurseForge",
        estimated_size: "~400MB",
        difficulty: "Intermediate",
    },
    Suggestion {
        name: "Enigmatica 6",
        description: "Expert-style kitchen sink modpack",
        game_version: "1.16.5",
        mod_loader: "Forge",
        instructions: "Download from CurseForge",
        estimated_size: "~600MB",
        difficulty: "Expert",
    },
];

/// Suggestions whose name or description contains `term`, ignoring case.
/// An empty term matches everything.
pub fn suggestions(term: &str) -> Vec<Suggestion> {
    let term = term.to_lowercase();
    SUGGESTIONS
        .iter()
        .filter(|s| {
            term.is_empty()
                || s.name.to_lowercase().contains(&term)
                || s.description.to_lowercase().contains(&term)
        })
        .copied()
        .collect()
}

/// Matching suggestions as search results, at most `limit` of them.
pub fn search(term: &str, limit: usize) -> Vec<SearchResult> {
    suggestions(term)
        .into_iter()
        .take(limit)
        .zip(FALLBACK_ID_OFFSET..)
        .map(|(s, id)| SearchResult {
            id,
            name: s.name.to_string(),
            summary: s.description.to_string(),
            download_count: 0,
            categories: vec![s.difficulty.to_string()],
            authors: vec![FALLBACK_AUTHOR.to_string()],
            logo_url: None,
            last_updated: None,
        })
        .collect()
}

/// A site that hosts modpacks, for pointing users somewhere useful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HostingSite {
    pub name: &'static str,
    pub url: &'static str,
    pub description: &'static str,
    pub api_required: bool,
    pub instructions: &'static str,
}

pub fn hosting_sites() -> &'static [HostingSite] {
    &[
        HostingSite {
            name: "CurseForge",
            url: "https://www.curseforge.com/minecraft/modpacks",
            description: "Official CurseForge modpack repository",
            api_required: true,
            instructions: "Browse modpacks and copy the download link from the Files tab",
        },
        HostingSite {
            name: "Modrinth",
            url: "https://modrinth.com/modpacks",
            description: "Modern modpack platform with direct downloads",
            api_required: false,
            instructions: "Click on a modpack version and copy the download link",
        },
        HostingSite {
            name: "ATLauncher",
            url: "https://atlauncher.com/packs",
            description: "ATLauncher modpack repository",
            api_required: false,
            instructions: "Find the modpack and look for direct download links",
        },
        HostingSite {
            name: "Technic Platform",
            url: "https://www.technicpack.net/modpacks",
            description: "Technic modpack platform",
            api_required: false,
            instructions: "Browse modpacks and find download links in modpack details",
        },
        HostingSite {
            name: "Feed The Beast",
            url: "https://www.feed-the-beast.com/modpacks",
            description: "FTB official modpacks",
            api_required: false,
            instructions: "Download modpack files directly from FTB website",
        },
    ]
}
