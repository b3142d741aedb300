//! Product rows.

use serde::Serialize;
use serde_json::Value;

use super::localized::LocalizedText;
use super::record::{MappingError, RawRecord};

const ENTITY: &str = "product";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub url: String,
    pub is_default: bool,
}

/// A brand or tag linked to a product through a join table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedEntity {
    pub id: String,
    pub name: LocalizedText,
    pub logo_url: Option<String>,
}

impl LinkedEntity {
    /// Standalone brand/tag record (`id`, `name`, optional `logo_url`).
    pub fn from_record(entity: &'static str, value: &Value) -> Result<Self, MappingError> {
        let record = RawRecord::new(entity, value)?;
        Ok(Self {
            id: record.require_id("id")?,
            name: record.localized("name")?.unwrap_or_default(),
            logo_url: record.string("logo_url")?.map(str::to_string),
        })
    }

    /// Entry of a join array such as `product_brands`: `{brand_id, brands}`
    /// where `brands` is an object or a one-element array. Entries whose
    /// relation did not resolve are skipped.
    fn from_join(
        join: &RawRecord<'_>,
        id_field: &str,
        relation: &str,
    ) -> Result<Option<Self>, MappingError> {
        let Some(related) = join.relation(relation)? else {
            return Ok(None);
        };
        let id = match join.require_id(id_field) {
            Ok(id) => id,
            Err(_) => related.require_id("id")?,
        };
        Ok(Some(Self {
            id,
            name: related.localized("name")?.unwrap_or_default(),
            logo_url: related.string("logo_url")?.map(str::to_string),
        }))
    }
}

/// Product as shown in the products table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRow {
    pub id: String,
    pub name: LocalizedText,
    pub slug: Option<String>,
    pub kcal: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub is_public: bool,
    pub images: Vec<ProductImage>,
    pub brands: Vec<LinkedEntity>,
    pub tags: Vec<LinkedEntity>,
}

impl ProductRow {
    /// Map a `products` row joined with `product_tags(tag_id, tags(*))` and
    /// `product_brands(brand_id, brands(*))`.
    pub fn from_record(value: &Value) -> Result<Self, MappingError> {
        let record = RawRecord::new(ENTITY, value)?;

        let images = record
            .array("images")?
            .iter()
            .map(|image| {
                let image = RawRecord::new(ENTITY, image)?;
                Ok(ProductImage {
                    url: image.require_string("url")?.to_string(),
                    is_default: image.bool("isDefault")?.unwrap_or(false),
                })
            })
            .collect::<Result<Vec<_>, MappingError>>()?;

        Ok(Self {
            id: record.require_id("id")?,
            name: record.require_localized("name")?,
            slug: record.string("slug")?.map(str::to_string),
            kcal: record.number("kcal")?,
            protein: record.number("protein")?,
            carbs: record.number("carbs")?,
            fat: record.number("fat")?,
            is_public: record.bool("is_public")?.unwrap_or(false),
            images,
            brands: linked(&record, "product_brands", "brand_id", "brands")?,
            tags: linked(&record, "product_tags", "tag_id", "tags")?,
        })
    }

    /// The image flagged as default, else the first one.
    pub fn default_image(&self) -> Option<&ProductImage> {
        self.images
            .iter()
            .find(|i| i.is_default)
            .or_else(|| self.images.first())
    }

    /// Lowercased name of the first brand, used to sort by brand.
    pub fn brand_sort_key(&self, locale: &str) -> String {
        self.brands
            .first()
            .map(|b| b.name.resolve(locale).to_lowercase())
            .unwrap_or_default()
    }

    pub fn brand_ids(&self) -> Vec<&str> {
        self.brands.iter().map(|b| b.id.as_str()).collect()
    }

    pub fn tag_ids(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.id.as_str()).collect()
    }
}

fn linked(
    record: &RawRecord<'_>,
    join_field: &str,
    id_field: &str,
    relation: &str,
) -> Result<Vec<LinkedEntity>, MappingError> {
    let mut out = Vec::new();
    for join in record.array(join_field)? {
        let join = RawRecord::new(record.entity(), join)?;
        if let Some(entity) = LinkedEntity::from_join(&join, id_field, relation)? {
            out.push(entity);
        }
    }
    Ok(out)
}
