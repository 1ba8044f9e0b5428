//! AQI category bands and the health messaging keyed on them.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AqiCategory {
    pub level: &'static str,
    pub color: &'static str,
    pub bg_color: &'static str,
    pub range: [u32; 2],
    pub health_implications: &'static str,
    pub cautionary_statement: &'static str,
}

impl AqiCategory {
    fn contains(&self, aqi: u32) -> bool {
        (self.range[0]..=self.range[1]).contains(&aqi)
    }
}

pub static AQI_CATEGORIES: [AqiCategory; 6] = [
    AqiCategory {
        level: "Good",
        color: "#22c55e",
        bg_color: "#dcfce7",
        range: [0, 50],
        health_implications: "Air quality is satisfactory, and air pollution poses little or no risk.",
        cautionary_statement: "None",
    },
    AqiCategory {
        level: "Moderate",
        color: "#eab308",
        bg_color: "#fef9c3",
        range: [51, 100],
        health_implications: "Air quality is acceptable. However, there may be a risk for some people, particularly those who are unusually sensitive to air pollution.",
        cautionary_statement: "Unusually sensitive people should consider limiting prolonged outdoor exertion.",
    },
    AqiCategory {
        level: "Unhealthy for Sensitive Groups",
        color: "#f97316",
        bg_color: "#fed7aa",
        range: [101, 150],
        health_implications: "Members of sensitive groups may experience health effects. The general public is less likely to be affected.",
        cautionary_statement: "Children, elderly, and people with respiratory or heart conditions should limit prolonged outdoor exertion.",
    },
    AqiCategory {
        level: "Unhealthy",
        color: "#ef4444",
        bg_color: "#fecaca",
        range: [151, 200],
        health_implications: "Some members of the general public may experience health effects; members of sensitive groups may experience more serious health effects.",
        cautionary_statement: "Everyone should limit prolonged outdoor exertion. Sensitive groups should avoid outdoor activities.",
    },
    AqiCategory {
        level: "Very Unhealthy",
        color: "#a855f7",
        bg_color: "#e9d5ff",
        range: [201, 300],
        health_implications: "Health alert: The risk of health effects is increased for everyone.",
        cautionary_statement: "Everyone should avoid prolonged outdoor exertion. Sensitive groups should remain indoors.",
    },
    AqiCategory {
        level: "Hazardous",
        color: "#7f1d1d",
        bg_color: "#fca5a5",
        range: [301, 500],
        health_implications: "Health warning of emergency conditions: everyone is more likely to be affected.",
        cautionary_statement: "Everyone should avoid all outdoor exertion. Stay indoors with windows closed.",
    },
];

/// Category whose closed range contains `aqi`; anything above 500 is Hazardous.
pub fn aqi_category(aqi: u32) -> &'static AqiCategory {
    AQI_CATEGORIES
        .iter()
        .find(|c| c.contains(aqi))
        .unwrap_or(&AQI_CATEGORIES[AQI_CATEGORIES.len() - 1])
}

pub fn aqi_color(aqi: u32) -> &'static str {
    aqi_category(aqi).color
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthAdvisory {
    pub icon: &'static str,
    pub title: &'static str,
    pub content: &'static str,
    pub color: &'static str,
    pub priority: Priority,
}

const fn advisory(
    icon: &'static str,
    title: &'static str,
    content: &'static str,
    color: &'static str,
    priority: Priority,
) -> HealthAdvisory {
    HealthAdvisory {
        icon,
        title,
        content,
        color,
        priority,
    }
}

static GOOD_ADVISORIES: [HealthAdvisory; 1] = [advisory(
    "check",
    "Safe for Everyone",
    "Air quality is excellent. Perfect day for outdoor activities and exercise.",
    "#22c55e",
    Priority::Low,
)];

static MODERATE_ADVISORIES: [HealthAdvisory; 2] = [
    advisory(
        "info",
        "Generally Safe",
        "Air quality is acceptable for most people. Unusually sensitive individuals should watch for symptoms.",
        "#eab308",
        Priority::Low,
    ),
    advisory(
        "users",
        "Sensitive Groups",
        "People with asthma or respiratory conditions should monitor their symptoms and have medication ready.",
        "#eab308",
        Priority::Medium,
    ),
];

static SENSITIVE_ADVISORIES: [HealthAdvisory; 3] = [
    advisory(
        "alert",
        "Sensitive Groups Alert",
        "Children, elderly, and people with asthma or heart disease should limit prolonged outdoor activities.",
        "#f97316",
        Priority::High,
    ),
    advisory(
        "heart",
        "Asthma & Respiratory",
        "Keep rescue inhalers accessible. Consider using air purifiers indoors. Close windows during peak pollution hours.",
        "#f97316",
        Priority::High,
    ),
    advisory(
        "activity",
        "Exercise Caution",
        "Reduce intensity of outdoor exercise. Consider moving workouts indoors or to early morning hours.",
        "#f97316",
        Priority::Medium,
    ),
];

static UNHEALTHY_ADVISORIES: [HealthAdvisory; 4] = [
    advisory(
        "alert-triangle",
        "Health Alert",
        "Everyone should limit prolonged outdoor exertion. Sensitive groups should avoid outdoor activities entirely.",
        "#ef4444",
        Priority::High,
    ),
    advisory(
        "heart",
        "Asthma & Heart Conditions",
        "Stay indoors with windows closed. Use air purifiers with HEPA filters. Have medications readily available. Seek medical attention if symptoms worsen.",
        "#ef4444",
        Priority::High,
    ),
    advisory(
        "users",
        "Children & Elderly",
        "Keep children and elderly indoors. Cancel outdoor activities and sports. Monitor for coughing, difficulty breathing, or eye irritation.",
        "#ef4444",
        Priority::High,
    ),
    advisory(
        "home",
        "Indoor Air Quality",
        "Keep all windows and doors closed. Run air conditioning with clean filters. Avoid using candles, fireplaces, or other indoor pollution sources.",
        "#ef4444",
        Priority::Medium,
    ),
];

static EMERGENCY_ADVISORIES: [HealthAdvisory; 5] = [
    advisory(
        "alert-octagon",
        "EMERGENCY: Stay Indoors",
        "Health emergency conditions. Everyone should avoid all outdoor activities. Stay indoors with windows and doors sealed.",
        "#7f1d1d",
        Priority::High,
    ),
    advisory(
        "heart",
        "Medical Alert",
        "People with respiratory or heart conditions should remain indoors and minimize physical activity. Have emergency medications ready. Contact healthcare provider if experiencing symptoms.",
        "#7f1d1d",
        Priority::High,
    ),
    advisory(
        "users",
        "Protect Vulnerable Groups",
        "Children, elderly, pregnant women, and those with chronic conditions must stay indoors. Create a clean air room with air purifiers running continuously.",
        "#7f1d1d",
        Priority::High,
    ),
    advisory(
        "home",
        "Seal Your Home",
        "Close all windows and doors. Seal gaps with towels. Run HVAC with clean filters on recirculate mode. Use multiple air purifiers if available.",
        "#7f1d1d",
        Priority::High,
    ),
    advisory(
        "shield",
        "If You Must Go Outside",
        "Wear N95 or P100 respirator masks (not cloth or surgical masks). Limit time outdoors to absolute minimum. Avoid any physical exertion.",
        "#7f1d1d",
        Priority::High,
    ),
];

/// Advisory cards for a reading. Very Unhealthy and Hazardous share one set.
pub fn health_advisories(aqi: u32) -> &'static [HealthAdvisory] {
    match aqi {
        0..=50 => &GOOD_ADVISORIES,
        51..=100 => &MODERATE_ADVISORIES,
        101..=150 => &SENSITIVE_ADVISORIES,
        151..=200 => &UNHEALTHY_ADVISORIES,
        _ => &EMERGENCY_ADVISORIES,
    }
}

/// Plain-text warnings for sensitive populations.
pub fn sensitive_population_alerts(aqi: u32) -> &'static [&'static str] {
    match aqi {
        0..=50 => &[],
        51..=100 => &["People with asthma should monitor symptoms"],
        101..=150 => &[
            "Children should limit outdoor play",
            "Elderly should reduce outdoor activities",
            "Asthmatics should carry inhalers",
            "Outdoor workers should take frequent breaks",
        ],
        151..=200 => &[
            "Children should stay indoors",
            "Elderly should avoid going outside",
            "Asthmatics should stay indoors with medication ready",
            "Outdoor workers should wear protective masks",
            "Pregnant women should limit outdoor exposure",
        ],
        _ => &[
            "All children must remain indoors",
            "Elderly must not go outside",
            "Asthmatics should have emergency plan ready",
            "All outdoor work should be suspended",
            "Pregnant women must stay indoors",
            "Anyone with heart conditions should minimize activity",
        ],
    }
}

/// Everything the advisory panel shows for one AQI value.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthGuidance {
    pub aqi: u32,
    pub category: &'static AqiCategory,
    pub advisories: &'static [HealthAdvisory],
    pub sensitive_groups: &'static [&'static str],
}

pub fn guidance(aqi: u32) -> HealthGuidance {
    HealthGuidance {
        aqi,
        category: aqi_category(aqi),
        advisories: health_advisories(aqi),
        sensitive_groups: sensitive_population_alerts(aqi),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_are_contiguous_and_ascending() {
        for pair in AQI_CATEGORIES.windows(2) {
            assert_eq!(pair[0].range[1] + 1, pair[1].range[0]);
        }
    }

    #[test]
    fn advisory_bands_follow_breakpoints() {
        assert_eq!(health_advisories(50).len(), 1);
        assert_eq!(health_advisories(51).len(), 2);
        assert_eq!(health_advisories(150).len(), 3);
        assert_eq!(health_advisories(200).len(), 4);
        assert_eq!(health_advisories(201).len(), 5);
        assert_eq!(health_advisories(999)[0].title, "EMERGENCY: Stay Indoors");
    }

    #[test]
    fn sensitive_alerts_are_empty_when_good() {
        assert!(sensitive_population_alerts(0).is_empty());
        assert_eq!(sensitive_population_alerts(100).len(), 1);
        assert_eq!(sensitive_population_alerts(301).len(), 6);
    }

    #[test]
    fn color_tracks_category() {
        assert_eq!(aqi_color(175), "#ef4444");
    }
}
