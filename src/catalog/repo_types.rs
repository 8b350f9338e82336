use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_IMAGE: &str = "/images/default-service.jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Masajes,
    Faciales,
    Corporales,
    Relajacion,
    Belleza,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Masajes,
        Category::Faciales,
        Category::Corporales,
        Category::Relajacion,
        Category::Belleza,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Masajes => "masajes",
            Category::Faciales => "faciales",
            Category::Corporales => "corporales",
            Category::Relajacion => "relajacion",
            Category::Belleza => "belleza",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown category {s:?}"))
    }
}

/// Catalog entry offered to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: i32,
    pub duration_minutes: i32,
    pub image: String,
    pub category: Category,
    pub available: bool,
}

#[derive(Debug, FromRow)]
pub struct ServiceRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: i32,
    pub duration_minutes: i32,
    pub image: String,
    pub category: String,
    pub available: bool,
}

impl TryFrom<ServiceRow> for Service {
    type Error = anyhow::Error;

    fn try_from(r: ServiceRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            name: r.name,
            description: r.description,
            price: r.price,
            duration_minutes: r.duration_minutes,
            image: r.image,
            category: r.category.parse()?,
            available: r.available,
        })
    }
}

/// A service as written by the seed import; the id is assigned by storage.
#[derive(Debug, Clone)]
pub struct NewService {
    pub name: String,
    pub description: String,
    pub price: i32,
    pub duration_minutes: i32,
    pub image: String,
    pub category: Category,
}
