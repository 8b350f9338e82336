use tracing::info;

use super::repo_types::{Category, NewService};
use crate::store::{ServiceCatalog, StoreResult};

struct SeedEntry {
    name: &'static str,
    description: &'static str,
    price: i32,
    duration_minutes: i32,
    category: Category,
    image: &'static str,
}

const DEFAULT_CATALOG: &[SeedEntry] = &[
    SeedEntry {
        name: "Masaje Relajante Aromático",
        description: "Masaje de cuerpo entero con aceites esenciales para liberar tensiones y promover una relajación profunda.",
        price: 800,
        duration_minutes: 60,
        category: Category::Masajes,
        image: "/images/masaje-relajante.jpg",
    },
    SeedEntry {
        name: "Masaje de Tejido Profundo",
        description: "Masaje terapéutico intensivo para aliviar tensiones musculares crónicas, nudos y contracturas.",
        price: 950,
        duration_minutes: 60,
        category: Category::Masajes,
        image: "/images/masaje-tejido-profundo.jpg",
    },
    SeedEntry {
        name: "Masaje Prenatal Especializado",
        description: "Masaje para futuras madres que alivia las molestias del embarazo y reduce la hinchazón.",
        price: 850,
        duration_minutes: 60,
        category: Category::Masajes,
        image: "/images/masaje-prenatal.jpg",
    },
    SeedEntry {
        name: "Facial Hidratante Premium",
        description: "Limpieza profunda, exfoliación y mascarilla nutritiva que hidratan y rejuvenecen la piel.",
        price: 600,
        duration_minutes: 45,
        category: Category::Faciales,
        image: "/images/facial-hidratante.jpg",
    },
    SeedEntry {
        name: "Facial Anti-Edad Deluxe",
        description: "Tratamiento facial que estimula la producción de colágeno y reduce líneas de expresión.",
        price: 900,
        duration_minutes: 75,
        category: Category::Faciales,
        image: "/images/facial-anti-edad.jpg",
    },
    SeedEntry {
        name: "Envoltura Corporal Detox",
        description: "Arcillas minerales y productos naturales que eliminan toxinas y tonifican la piel.",
        price: 1200,
        duration_minutes: 90,
        category: Category::Corporales,
        image: "/images/envoltura-corporal.jpg",
    },
    SeedEntry {
        name: "Tratamiento Corporal Reafirmante",
        description: "Exfoliación, masaje reafirmante y productos específicos para mejorar la elasticidad corporal.",
        price: 1100,
        duration_minutes: 80,
        category: Category::Corporales,
        image: "/images/tratamiento-reafirmante.jpg",
    },
    SeedEntry {
        name: "Terapia de Piedras Calientes",
        description: "Masaje terapéutico con piedras volcánicas calientes para una relajación total.",
        price: 1000,
        duration_minutes: 75,
        category: Category::Relajacion,
        image: "/images/piedras-calientes.jpg",
    },
    SeedEntry {
        name: "Reflexología Terapéutica",
        description: "Presión en puntos específicos de los pies para mejorar la circulación y el equilibrio.",
        price: 550,
        duration_minutes: 45,
        category: Category::Relajacion,
        image: "/images/reflexologia.jpg",
    },
    SeedEntry {
        name: "Ritual de Relajación Completo",
        description: "Baño aromático, exfoliación suave, masaje de cuerpo completo y facial hidratante.",
        price: 1800,
        duration_minutes: 120,
        category: Category::Relajacion,
        image: "/images/ritual-relajacion.jpg",
    },
    SeedEntry {
        name: "Manicure y Pedicure Spa",
        description: "Limpieza, exfoliación, hidratación y esmaltado profesional para manos y pies.",
        price: 450,
        duration_minutes: 60,
        category: Category::Belleza,
        image: "/images/manicure-spa.jpg",
    },
    SeedEntry {
        name: "Depilación con Cera Premium",
        description: "Depilación con ceras de alta calidad para una piel suave por más tiempo.",
        price: 350,
        duration_minutes: 30,
        category: Category::Belleza,
        image: "/images/depilacion-cera.jpg",
    },
];

pub fn default_catalog() -> Vec<NewService> {
    DEFAULT_CATALOG
        .iter()
        .map(|e| NewService {
            name: e.name.into(),
            description: e.description.into(),
            price: e.price,
            duration_minutes: e.duration_minutes,
            image: e.image.into(),
            category: e.category,
        })
        .collect()
}

/// Upserts the default catalog and returns how many entries were written.
pub async fn seed_catalog<S>(store: &S) -> StoreResult<usize>
where
    S: ServiceCatalog + ?Sized,
{
    let entries = default_catalog();
    let total = entries.len();
    for entry in entries {
        let svc = store.upsert_service(entry).await?;
        info!(service_id = %svc.id, name = %svc.name, category = %svc.category, "service seeded");
    }
    Ok(total)
}
