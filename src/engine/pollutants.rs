//! Reference sheet for the tracked pollutants and AQI-keyed health tips.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollutantInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub formula: &'static str,
    pub description: &'static str,
    pub sources: [&'static str; 5],
    pub health_effects: [&'static str; 5],
    pub safe_level: &'static str,
    /// Badge classes used by the dashboard.
    pub color: &'static str,
}

pub static POLLUTANTS: [PollutantInfo; 6] = [
    PollutantInfo {
        id: "pm25",
        name: "Fine Particulate Matter",
        formula: "PM2.5",
        description: "Tiny particles or droplets in the air that are 2.5 micrometers or less in width. These particles are so small they can penetrate deep into the lungs and even enter the bloodstream.",
        sources: [
            "Vehicle exhaust and emissions",
            "Industrial facilities and power plants",
            "Residential wood burning",
            "Wildfires and agricultural burning",
            "Construction and road dust",
        ],
        health_effects: [
            "Respiratory irritation and reduced lung function",
            "Aggravation of asthma and chronic bronchitis",
            "Increased risk of heart attacks and strokes",
            "Premature death in people with heart or lung disease",
            "Developmental issues in children",
        ],
        safe_level: "0-12 μg/m³ (WHO guideline)",
        color: "bg-purple-100 text-purple-800 border-purple-300",
    },
    PollutantInfo {
        id: "pm10",
        name: "Coarse Particulate Matter",
        formula: "PM10",
        description: "Inhalable particles with diameters of 10 micrometers or less. While larger than PM2.5, these particles can still penetrate into the lungs and cause health problems.",
        sources: [
            "Dust from roads and construction sites",
            "Crushing and grinding operations",
            "Agricultural activities",
            "Windblown dust from open lands",
            "Industrial emissions",
        ],
        health_effects: [
            "Irritation of airways and coughing",
            "Difficulty breathing and chest tightness",
            "Aggravation of asthma symptoms",
            "Reduced lung function",
            "Increased hospital admissions for respiratory issues",
        ],
        safe_level: "0-20 μg/m³ (WHO guideline)",
        color: "bg-amber-100 text-amber-800 border-amber-300",
    },
    PollutantInfo {
        id: "no2",
        name: "Nitrogen Dioxide",
        formula: "NO₂",
        description: "A reddish-brown gas with a sharp, harsh odor. It forms when fossil fuels are burned at high temperatures and is a major component of urban air pollution.",
        sources: [
            "Vehicle emissions (especially diesel)",
            "Power plants and industrial facilities",
            "Gas stoves and heating appliances",
            "Cigarette smoke",
            "Welding operations",
        ],
        health_effects: [
            "Inflammation of airways and reduced immunity",
            "Increased susceptibility to respiratory infections",
            "Worsening of asthma and bronchitis",
            "Reduced lung development in children",
            "Increased emergency room visits",
        ],
        safe_level: "0-25 μg/m³ annual mean (WHO guideline)",
        color: "bg-red-100 text-red-800 border-red-300",
    },
    PollutantInfo {
        id: "o3",
        name: "Ground-level Ozone",
        formula: "O₃",
        description: "A colorless gas formed when pollutants from cars, power plants, and other sources react with sunlight. Unlike stratospheric ozone which protects us, ground-level ozone is harmful.",
        sources: [
            "Chemical reaction of NOx and VOCs in sunlight",
            "Vehicle exhaust emissions",
            "Industrial facility emissions",
            "Gasoline vapors and chemical solvents",
            "Worse on hot, sunny days",
        ],
        health_effects: [
            "Chest pain and throat irritation",
            "Coughing and breathing difficulty",
            "Reduced lung function and capacity",
            "Aggravation of asthma and emphysema",
            "Increased risk of premature death",
        ],
        safe_level: "0-100 μg/m³ peak season (WHO guideline)",
        color: "bg-blue-100 text-blue-800 border-blue-300",
    },
    PollutantInfo {
        id: "so2",
        name: "Sulfur Dioxide",
        formula: "SO₂",
        description: "A colorless gas with a pungent, suffocating odor. It's produced by burning fossil fuels containing sulfur and from volcanic eruptions.",
        sources: [
            "Coal and oil combustion at power plants",
            "Metal smelting and processing",
            "Diesel engines and ships",
            "Volcanic activity",
            "Industrial processes using sulfur",
        ],
        health_effects: [
            "Respiratory problems and difficulty breathing",
            "Aggravation of existing heart disease",
            "Increased asthma attacks",
            "Eye, nose, and throat irritation",
            "Contributes to acid rain formation",
        ],
        safe_level: "0-40 μg/m³ 24-hour mean (WHO guideline)",
        color: "bg-red-100 text-red-800 border-red-300",
    },
    PollutantInfo {
        id: "co",
        name: "Carbon Monoxide",
        formula: "CO",
        description: "A colorless, odorless gas produced by incomplete combustion of carbon-containing fuels. It reduces oxygen delivery to the body's organs and tissues.",
        sources: [
            "Vehicle exhaust emissions",
            "Residential heating systems",
            "Gas stoves and appliances",
            "Cigarette smoke",
            "Industrial processes",
        ],
        health_effects: [
            "Reduced oxygen delivery to organs",
            "Chest pain in people with heart disease",
            "Headaches and dizziness",
            "Confusion and impaired vision",
            "Fatal at very high concentrations",
        ],
        safe_level: "0-4 mg/m³ 24-hour mean (WHO guideline)",
        color: "bg-gray-100 text-gray-800 border-gray-300",
    },
];

/// Lookup by id, case-insensitive (`"PM25"` finds `pm25`).
pub fn pollutant_info(id: &str) -> Option<&'static PollutantInfo> {
    let id = id.trim();
    POLLUTANTS.iter().find(|p| p.id.eq_ignore_ascii_case(id))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TipCategory {
    Prevention,
    Indoor,
    Outdoor,
    Sensitive,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthTip {
    pub id: &'static str,
    pub category: TipCategory,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

pub static HEALTH_TIPS: [HealthTip; 12] = [
    HealthTip {
        id: "check-aqi",
        category: TipCategory::Prevention,
        title: "Check AQI Daily",
        description: "Monitor air quality levels before planning outdoor activities, especially during high pollution days.",
        icon: "📊",
    },
    HealthTip {
        id: "limit-outdoor",
        category: TipCategory::Outdoor,
        title: "Limit Outdoor Exercise",
        description: "Reduce intense outdoor activities when AQI is unhealthy. Exercise indoors or during times when air quality is better.",
        icon: "🏃",
    },
    HealthTip {
        id: "wear-mask",
        category: TipCategory::Outdoor,
        title: "Wear N95 Masks",
        description: "Use properly fitted N95 or P100 respirators when AQI exceeds 150 to filter out harmful particles.",
        icon: "😷",
    },
    HealthTip {
        id: "close-windows",
        category: TipCategory::Indoor,
        title: "Keep Windows Closed",
        description: "Close windows and doors during high pollution days to prevent outdoor air from entering your home.",
        icon: "🪟",
    },
    HealthTip {
        id: "air-purifier",
        category: TipCategory::Indoor,
        title: "Use Air Purifiers",
        description: "Run HEPA air purifiers indoors to remove particles and improve indoor air quality, especially in bedrooms.",
        icon: "💨",
    },
    HealthTip {
        id: "avoid-traffic",
        category: TipCategory::Outdoor,
        title: "Avoid High-Traffic Areas",
        description: "Stay away from busy roads and highways where vehicle emissions are concentrated.",
        icon: "🚗",
    },
    HealthTip {
        id: "indoor-plants",
        category: TipCategory::Indoor,
        title: "Add Indoor Plants",
        description: "Certain plants like spider plants and peace lilies can help filter indoor air pollutants naturally.",
        icon: "🌿",
    },
    HealthTip {
        id: "ventilation",
        category: TipCategory::Indoor,
        title: "Improve Ventilation",
        description: "Use exhaust fans when cooking and ensure proper ventilation to reduce indoor pollutant buildup.",
        icon: "🌬️",
    },
    HealthTip {
        id: "medication-ready",
        category: TipCategory::Sensitive,
        title: "Keep Medication Handy",
        description: "If you have asthma or respiratory conditions, always have your rescue inhaler and medications accessible.",
        icon: "💊",
    },
    HealthTip {
        id: "stay-hydrated",
        category: TipCategory::Prevention,
        title: "Stay Hydrated",
        description: "Drink plenty of water to help your body flush out toxins and maintain respiratory health.",
        icon: "💧",
    },
    HealthTip {
        id: "reduce-emissions",
        category: TipCategory::Prevention,
        title: "Reduce Personal Emissions",
        description: "Use public transport, carpool, or bike to reduce your contribution to air pollution.",
        icon: "🚲",
    },
    HealthTip {
        id: "doctor-consult",
        category: TipCategory::Sensitive,
        title: "Consult Your Doctor",
        description: "If you're in a sensitive group, work with your healthcare provider to create an air quality action plan.",
        icon: "👨‍⚕️",
    },
];

/// Tips worth showing at `aqi`, in table order. Indoor tips only appear
/// above 150.
pub fn tips_for_aqi(aqi: f64) -> Vec<&'static HealthTip> {
    let keep = |tip: &HealthTip| {
        if aqi <= 50.0 {
            tip.category == TipCategory::Prevention
        } else if aqi <= 100.0 {
            matches!(tip.category, TipCategory::Prevention | TipCategory::Sensitive)
        } else if aqi <= 150.0 {
            tip.category != TipCategory::Indoor
        } else {
            true
        }
    };
    HEALTH_TIPS.iter().filter(|tip| keep(*tip)).collect()
}
