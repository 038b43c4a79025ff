use bevy::prelude::*;
use bevy::utils::HashMap;
use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;

fn default_type_label() -> String {
    "undefined".to_string()
}

fn default_probability() -> u8 {
    1
}

/// Immutable blueprint for a spawnable creature, declared in the RON catalog.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SpawnableTemplate {
    /// Primary category of this spawnable.
    #[serde(default = "default_type_label")]
    pub type_label: String,
    /// Selection tags ("goblin", "spearman", "goblin spearman", ...). A
    /// template may carry many tags and a tag may match many templates. A
    /// template with no tags is unreachable by lookup and stays dormant.
    #[serde(default)]
    pub tags: HashSet<String>,
    /// Commonality weight 0-255, 0 meaning unspawnable. Reserved for weighted
    /// selection; matched templates are currently picked uniformly.
    #[serde(default = "default_probability")]
    pub probability: u8,
    /// When set, the spawner must hold this item and gives up one unit per
    /// spawn.
    #[serde(default)]
    pub item_to_consume: Option<String>,
}

impl Default for SpawnableTemplate {
    fn default() -> Self {
        Self {
            type_label: default_type_label(),
            tags: HashSet::new(),
            probability: default_probability(),
            item_to_consume: None,
        }
    }
}

impl SpawnableTemplate {
    pub fn new(
        type_label: impl Into<String>,
        tags: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            type_label: type_label.into(),
            tags: tags.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

/// The full set of spawnable templates, as loaded from content.
#[derive(Asset, TypePath, Deserialize, Debug, Clone, Default)]
pub struct SpawnableCatalog {
    pub templates: Vec<SpawnableTemplate>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("malformed spawnable catalog: {0}")]
    Parse(#[from] ron::de::SpannedError),
}

impl SpawnableCatalog {
    /// Parses a catalog outside the asset pipeline, for headless hosts and
    /// tests.
    pub fn from_ron(source: &str) -> Result<Self, CatalogError> {
        Ok(ron::de::from_str(source)?)
    }
}

/// Live copy of the catalog. Source of truth for `TemplateIndex`.
#[derive(Resource, Debug, Clone, Default)]
pub struct SpawnableContent(pub SpawnableCatalog);

/// Derived tag -> template lookup. A cache, not a source of truth: rebuild it
/// whenever the content changes.
#[derive(Resource, Debug, Default)]
pub struct TemplateIndex {
    by_tag: HashMap<String, Vec<usize>>,
}

impl TemplateIndex {
    /// Rebuilds the whole index from the catalog. The fresh map replaces the
    /// old one in a single assignment, so readers never see a partial index.
    pub fn rebuild(&mut self, catalog: &SpawnableCatalog) {
        let mut by_tag: HashMap<String, Vec<usize>> = HashMap::default();
        for (slot, template) in catalog.templates.iter().enumerate() {
            for tag in &template.tags {
                by_tag.entry(tag.clone()).or_default().push(slot);
            }
        }
        self.by_tag = by_tag;
    }

    /// All catalog slots registered under `tag`. An unknown tag yields an
    /// empty slice, which is an ordinary outcome rather than an error.
    pub fn lookup(&self, tag: &str) -> &[usize] {
        self.by_tag.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn tag_count(&self) -> usize {
        self.by_tag.len()
    }
}

/// Asset path of the spawnable catalog, for hosts that load one.
#[derive(Resource, Clone, Debug)]
pub struct CatalogSource(pub String);

#[derive(Resource, Debug)]
pub struct CatalogHandle(pub Handle<SpawnableCatalog>);

pub fn load_spawnable_catalog(
    mut commands: Commands,
    source: Res<CatalogSource>,
    asset_server: Res<AssetServer>,
) {
    let handle: Handle<SpawnableCatalog> = asset_server.load(source.0.as_str());
    commands.insert_resource(CatalogHandle(handle));
}

/// Builds the index from whatever content is present at startup, covering
/// hosts that insert `SpawnableContent` directly instead of loading a
/// catalog asset.
pub fn rebuild_template_index(content: Res<SpawnableContent>, mut index: ResMut<TemplateIndex>) {
    index.rebuild(&content.0);
}

/// Copies freshly (re)loaded catalog assets into `SpawnableContent` and
/// rebuilds the tag index. This is the content-change notification path;
/// nothing else may mutate the index.
pub fn catalog_update_system(
    mut events: EventReader<AssetEvent<SpawnableCatalog>>,
    catalogs: Res<Assets<SpawnableCatalog>>,
    handle: Option<Res<CatalogHandle>>,
    mut content: ResMut<SpawnableContent>,
    mut index: ResMut<TemplateIndex>,
) {
    let Some(handle) = handle else {
        return;
    };
    for event in events.read() {
        let id = match event {
            AssetEvent::LoadedWithDependencies { id } | AssetEvent::Modified { id } => *id,
            _ => continue,
        };
        if id != handle.0.id() {
            continue;
        }
        if let Some(catalog) = catalogs.get(id) {
            content.0 = catalog.clone();
            index.rebuild(&content.0);
            info!(
                "Spawnable catalog loaded: {} templates over {} tags",
                content.0.templates.len(),
                index.tag_count()
            );
        }
    }
}
