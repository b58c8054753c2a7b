//! Seed the ingredient catalog and recipe tags from data files.
//!
//! Files are JSON or YAML lists, chosen by extension. Rows that already
//! exist are skipped, so seeding can be repeated safely.

use std::path::Path;

use foodgram_core::{HexColor, Slug};
use foodgram_server::db::{self, IngredientRepository, TagRepository};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::info;

/// Errors from reading a seed file.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Missing environment variable: FOODGRAM_DATABASE_URL")]
    MissingDatabaseUrl,

    #[error("Unsupported file type {0:?} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(String),

    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid tag {name:?}: {reason}")]
    InvalidTag { name: String, reason: String },
}

/// One catalog ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IngredientRecord {
    pub name: String,
    pub measurement_unit: String,
}

/// One recipe tag, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagRecord {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    pub slug: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self, SeedError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(SeedError::UnsupportedFormat(extension)),
        }
    }
}

fn parse_records<T: DeserializeOwned>(content: &str, format: Format) -> Result<Vec<T>, SeedError> {
    Ok(match format {
        Format::Json => serde_json::from_str(content)?,
        Format::Yaml => serde_yaml::from_str(content)?,
    })
}

async fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, SeedError> {
    let format = Format::from_path(path)?;
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Io {
            path: path.display().to_string(),
            source,
        })?;
    parse_records(&content, format)
}

/// Validate a tag record into its stored form.
fn validate_tag(record: TagRecord) -> Result<(String, HexColor, Slug), SeedError> {
    let invalid = |reason: String| SeedError::InvalidTag {
        name: record.name.clone(),
        reason,
    };

    let name = record.name.trim();
    if name.is_empty() {
        return Err(invalid("name must not be blank".to_string()));
    }
    let color = match record.color.as_deref() {
        Some(color) => HexColor::parse(color).map_err(|e| invalid(e.to_string()))?,
        None => HexColor::default(),
    };
    let slug = Slug::parse(&record.slug).map_err(|e| invalid(e.to_string()))?;

    Ok((name.to_string(), color, slug))
}

/// Insert ingredients from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or a database operation fails.
pub async fn ingredients(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let records: Vec<IngredientRecord> = read_records(path).await?;
    info!(path = %path.display(), count = records.len(), "Parsed ingredients");

    let database_url = super::database_url().ok_or(SeedError::MissingDatabaseUrl)?;
    let pool = db::create_pool(&database_url).await?;
    let repo = IngredientRepository::new(&pool);

    let mut inserted = 0_usize;
    for record in &records {
        let name = record.name.trim();
        let unit = record.measurement_unit.trim();
        if name.is_empty() || unit.is_empty() {
            tracing::warn!(?record, "Skipping ingredient with blank name or unit");
            continue;
        }
        if repo.insert_if_missing(name, unit).await? {
            inserted += 1;
        }
    }

    info!(
        inserted,
        skipped = records.len() - inserted,
        "Ingredient seeding complete"
    );
    Ok(())
}

/// Insert tags from `path`.
///
/// All records are validated before anything is written.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, a tag is invalid,
/// or a database operation fails.
pub async fn tags(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let records: Vec<TagRecord> = read_records(path).await?;
    let tags = records
        .into_iter()
        .map(validate_tag)
        .collect::<Result<Vec<_>, _>>()?;
    info!(path = %path.display(), count = tags.len(), "Parsed tags");

    let database_url = super::database_url().ok_or(SeedError::MissingDatabaseUrl)?;
    let pool = db::create_pool(&database_url).await?;
    let repo = TagRepository::new(&pool);

    let mut inserted = 0_usize;
    for (name, color, slug) in &tags {
        if repo.insert_if_missing(name, color, slug).await? {
            inserted += 1;
        }
    }

    info!(
        inserted,
        skipped = tags.len() - inserted,
        "Tag seeding complete"
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            Format::from_path(Path::new("data/ingredients.json")).unwrap(),
            Format::Json
        );
        assert_eq!(Format::from_path(Path::new("tags.YML")).unwrap(), Format::Yaml);
        assert!(matches!(
            Format::from_path(Path::new("ingredients.csv")),
            Err(SeedError::UnsupportedFormat(ext)) if ext == "csv"
        ));
    }

    #[test]
    fn test_parse_ingredients_json() {
        let records: Vec<IngredientRecord> = parse_records(
            r#"[{"name": "flour", "measurement_unit": "g"}, {"name": "egg", "measurement_unit": "pcs"}]"#,
            Format::Json,
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].measurement_unit, "pcs");
    }

    #[test]
    fn test_parse_tags_yaml() {
        let records: Vec<TagRecord> = parse_records(
            "- name: Breakfast\n  color: '#e26c2d'\n  slug: breakfast\n- name: Dinner\n  slug: dinner\n",
            Format::Yaml,
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].color, None);
    }

    #[test]
    fn test_validate_tag() {
        let (name, color, slug) = validate_tag(TagRecord {
            name: " Breakfast ".to_string(),
            color: Some("#e26c2d".to_string()),
            slug: "breakfast".to_string(),
        })
        .unwrap();
        assert_eq!(name, "Breakfast");
        assert_eq!(color.as_str(), "#E26C2D");
        assert_eq!(slug.as_str(), "breakfast");
    }

    #[test]
    fn test_validate_tag_rejects_bad_slug() {
        let err = validate_tag(TagRecord {
            name: "Lunch".to_string(),
            color: None,
            slug: "lunch time!".to_string(),
        })
        .unwrap_err();
        assert!(matches!(err, SeedError::InvalidTag { ref name, .. } if name == "Lunch"));
    }
}
