//! Resolution of remote containers to local categories.

use std::collections::HashMap;

use uuid::Uuid;

use crate::entity::category::Model as CategoryModel;
use crate::provider::{CategoryMapping, RemoteSection};
use crate::store::{NewCategory, Result, SyncStore};

/// How a remote container was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryResolution {
    /// An operator-configured mapping matched the container id.
    Mapped(Uuid),
    /// Resolved earlier in this job.
    Cached(Uuid),
    /// A local category with the same name already existed.
    Existing(Uuid),
    /// A new local category was created.
    Created(CategoryModel),
    /// The container has no usable name.
    Uncategorized,
}

impl CategoryResolution {
    pub fn category_id(&self) -> Option<Uuid> {
        match self {
            Self::Mapped(id) | Self::Cached(id) | Self::Existing(id) => Some(*id),
            Self::Created(category) => Some(category.id),
            Self::Uncategorized => None,
        }
    }
}

/// Per-job resolver from remote containers to local category ids.
///
/// Order: explicit mapping, then the job cache, then an existing local category
/// with the same name (case-insensitive), then a new category appended after
/// the last position. Containers without a name stay uncategorized. Created
/// categories are not written back into the configured mappings.
pub struct CategoryMapper<'a> {
    store: &'a dyn SyncStore,
    knowledge_base_id: Uuid,
    mappings: &'a [CategoryMapping],
    cache: HashMap<String, Uuid>,
}

impl<'a> CategoryMapper<'a> {
    pub fn new(
        store: &'a dyn SyncStore,
        knowledge_base_id: Uuid,
        mappings: &'a [CategoryMapping],
    ) -> Self {
        Self {
            store,
            knowledge_base_id,
            mappings,
            cache: HashMap::new(),
        }
    }

    pub async fn resolve(&mut self, container: &RemoteSection) -> Result<CategoryResolution> {
        if let Some(mapping) = self
            .mappings
            .iter()
            .find(|m| m.external_section_id == container.id)
        {
            return Ok(CategoryResolution::Mapped(mapping.local_category_id));
        }

        if let Some(id) = self.cache.get(&container.id) {
            return Ok(CategoryResolution::Cached(*id));
        }

        let name = container.name.trim();
        if name.is_empty() {
            return Ok(CategoryResolution::Uncategorized);
        }

        let existing = self
            .store
            .get_categories_by_knowledge_base_id(self.knowledge_base_id)
            .await?;

        if let Some(category) = existing
            .iter()
            .find(|c| c.name.trim().eq_ignore_ascii_case(name))
        {
            self.cache.insert(container.id.clone(), category.id);
            return Ok(CategoryResolution::Existing(category.id));
        }

        let position = existing
            .iter()
            .map(|c| c.position)
            .max()
            .map_or(0, |max| max.saturating_add(1));

        let created = self
            .store
            .create_category(NewCategory {
                knowledge_base_id: self.knowledge_base_id,
                name: name.to_string(),
                description: container.description.clone(),
                position,
            })
            .await?;

        tracing::info!(
            category_id = %created.id,
            name = %created.name,
            container_id = %container.id,
            "Created local category"
        );

        self.cache.insert(container.id.clone(), created.id);
        Ok(CategoryResolution::Created(created))
    }
}

/// Remote container an exported article should land in: the section mapped to
/// its local category, else the default section.
pub fn export_target(
    mappings: &[CategoryMapping],
    category_id: Option<Uuid>,
    default_section_id: Option<&str>,
) -> Option<String> {
    category_id
        .and_then(|id| mappings.iter().find(|m| m.local_category_id == id))
        .map(|m| m.external_section_id.clone())
        .or_else(|| {
            default_section_id
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(local: Uuid, section: &str) -> CategoryMapping {
        CategoryMapping {
            local_category_id: local,
            external_section_id: section.to_string(),
            external_section_name: None,
        }
    }

    #[test]
    fn export_target_prefers_mapping() {
        let cat = Uuid::new_v4();
        let mappings = vec![mapping(cat, "42")];
        assert_eq!(
            export_target(&mappings, Some(cat), Some("1")).as_deref(),
            Some("42")
        );
    }

    #[test]
    fn export_target_falls_back_to_default() {
        let mappings = vec![mapping(Uuid::new_v4(), "42")];
        assert_eq!(
            export_target(&mappings, Some(Uuid::new_v4()), Some("1")).as_deref(),
            Some("1")
        );
        assert_eq!(export_target(&mappings, None, Some("1")).as_deref(), Some("1"));
    }

    #[test]
    fn export_target_without_default_is_none() {
        assert_eq!(export_target(&[], Some(Uuid::new_v4()), None), None);
        assert_eq!(export_target(&[], None, Some("  ")), None);
    }

    #[test]
    fn resolution_category_id() {
        let id = Uuid::new_v4();
        assert_eq!(CategoryResolution::Mapped(id).category_id(), Some(id));
        assert_eq!(CategoryResolution::Cached(id).category_id(), Some(id));
        assert_eq!(CategoryResolution::Uncategorized.category_id(), None);
    }
}
