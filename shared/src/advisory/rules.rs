//! Ordered keyword rule table and category templates

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{ProfileView, WeatherSnapshot, FALLBACK_PRECIPITATION_PCT, FALLBACK_TEMPERATURE_C};
use crate::types::{Language, LocalizedText};

/// Temperature above which the pest template adds a risk clause
pub const PEST_RISK_TEMPERATURE_C: f64 = 30.0;

/// Compost dose per cent of land when no rain is expected
pub const BASE_COMPOST_KG_PER_CENT: i64 = 2;

/// Advice category selected by keyword match
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryCategory {
    Rain,
    Pest,
    Fertilizer,
}

impl AdvisoryCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdvisoryCategory::Rain => "rain",
            AdvisoryCategory::Pest => "pest",
            AdvisoryCategory::Fertilizer => "fertilizer",
        }
    }
}

/// Weather values the templates interpolate, already defaulted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conditions {
    pub temperature_c: f64,
    pub precipitation_pct: i32,
}

impl Conditions {
    pub fn from_snapshot(weather: Option<&WeatherSnapshot>) -> Self {
        match weather {
            Some(w) => Self {
                temperature_c: w.temperature_c,
                precipitation_pct: w.precipitation_probability_pct.clamp(0, 100),
            },
            None => Self {
                temperature_c: FALLBACK_TEMPERATURE_C,
                precipitation_pct: FALLBACK_PRECIPITATION_PCT,
            },
        }
    }
}

/// Inputs a template renders from
pub struct AdvisoryContext<'a> {
    pub profile: ProfileView<'a>,
    pub conditions: Conditions,
}

/// One entry of the rule table: a keyword set and the template it selects
pub struct AdvisoryRule {
    pub category: AdvisoryCategory,
    /// Malayalam and English keywords, lowercase
    pub keywords: &'static [&'static str],
    pub template: fn(&AdvisoryContext<'_>) -> LocalizedText,
}

impl AdvisoryRule {
    /// `folded` must already be lowercased
    pub fn matches(&self, folded: &str) -> bool {
        self.keywords.iter().any(|k| folded.contains(k))
    }
}

/// Rules in priority order. The first match wins.
pub static RULES: &[AdvisoryRule] = &[
    AdvisoryRule {
        category: AdvisoryCategory::Rain,
        keywords: &["rain", "മഴ", "monsoon", "മൺസൂൺ"],
        template: rain_advice,
    },
    AdvisoryRule {
        category: AdvisoryCategory::Pest,
        keywords: &["pest", "കീടം", "insect"],
        template: pest_advice,
    },
    AdvisoryRule {
        category: AdvisoryCategory::Fertilizer,
        keywords: &["fertilizer", "fertiliser", "വളം", "compost", "manure"],
        template: fertilizer_advice,
    },
];

/// First rule whose keywords appear in the query, ignoring case
pub fn find_rule(query: &str) -> Option<&'static AdvisoryRule> {
    let folded = query.to_lowercase();
    RULES.iter().find(|rule| rule.matches(&folded))
}

pub fn match_category(query: &str) -> Option<AdvisoryCategory> {
    find_rule(query).map(|rule| rule.category)
}

/// Reply used when no rule matches
pub fn fallback_advice() -> LocalizedText {
    LocalizedText::new(
        "കൂടുതൽ വിശദാംശങ്ങൾ പറയൂ. ഉദാ: 'മഴ' അല്ലെങ്കിൽ 'കീടം'.",
        "Tell more. E.g., 'rain' or 'pest'.",
    )
}

fn rain_advice(ctx: &AdvisoryContext<'_>) -> LocalizedText {
    let p = ctx.conditions.precipitation_pct;
    let location = ctx.profile.location();
    let location_ml = ctx.profile.location_ml();
    let crop_ml = ctx.profile.crop(Language::Malayalam);
    let crop_en = ctx.profile.crop(Language::English);

    if p > 0 {
        LocalizedText::new(
            format!(
                "{}യിൽ ഇന്ന് മഴ സാധ്യത {}%. {} വിളയ്ക്ക് ജലസേചനം ഏകദേശം {}% കുറയ്ക്കുക.",
                location_ml, p, crop_ml, p
            ),
            format!(
                "Rain chance {}% in {} today. Reduce irrigation for {} by about {}%.",
                p, location, crop_en, p
            ),
        )
    } else {
        LocalizedText::new(
            format!(
                "{}യിൽ ഇന്ന് മഴ സാധ്യത 0%. {} വിളയ്ക്ക് പതിവുപോലെ ജലസേചനം നടത്തുക.",
                location_ml, crop_ml
            ),
            format!(
                "Rain chance 0% in {} today. Irrigate {} as usual.",
                location, crop_en
            ),
        )
    }
}

fn pest_advice(ctx: &AdvisoryContext<'_>) -> LocalizedText {
    let soil = ctx.profile.soil();
    let mut text = LocalizedText::new(
        format!(
            "{}യിൽ കീടങ്ങൾ: വേപ്പെണ്ണ സ്പ്രേ (10ml/ലിറ്റർ) ഉപയോഗിക്കുക. {} മണ്ണിന് അനുയോജ്യം.",
            ctx.profile.crop(Language::Malayalam),
            soil
        ),
        format!(
            "Pests in {}: Use neem spray 10ml/liter. Suitable for {} soil.",
            ctx.profile.crop(Language::English),
            soil
        ),
    );

    let t = ctx.conditions.temperature_c;
    if t > PEST_RISK_TEMPERATURE_C {
        text.message_ml.push_str(&format!(
            " ഉയർന്ന താപനില ({:.1}°C) കീടസാധ്യത കൂട്ടുന്നു; രണ്ട് ദിവസത്തിലൊരിക്കൽ ഇലകൾ പരിശോധിക്കുക.",
            t
        ));
        text.message_en.push_str(&format!(
            " High temperature ({:.1}°C) raises pest risk; inspect leaves every 2 days.",
            t
        ));
    }
    text
}

/// Compost dose scaled down by the chance of rain, to one decimal place
pub fn compost_dose_kg_per_cent(precipitation_pct: i32) -> Decimal {
    let dry_share = Decimal::from(100 - precipitation_pct.clamp(0, 100));
    (Decimal::from(BASE_COMPOST_KG_PER_CENT) * dry_share / Decimal::from(100)).round_dp(1)
}

fn fertilizer_advice(ctx: &AdvisoryContext<'_>) -> LocalizedText {
    let p = ctx.conditions.precipitation_pct;
    let soil = ctx.profile.soil();
    let dose = compost_dose_kg_per_cent(p);

    if dose.is_zero() {
        return LocalizedText::new(
            format!(
                "മഴ സാധ്യത {}%. മഴ കഴിയുന്നതുവരെ {} മണ്ണിൽ കമ്പോസ്റ്റ് ഇടുന്നത് മാറ്റിവയ്ക്കുക.",
                p, soil
            ),
            format!(
                "Rain chance {}%. Postpone compost on your {} soil until the rain passes.",
                p, soil
            ),
        );
    }

    LocalizedText::new(
        format!(
            "{} മണ്ണിന് ഓർഗാനിക് കമ്പോസ്റ്റ് {:.1}kg/സെന്റ്. മഴ സാധ്യത {}%.",
            soil, dose, p
        ),
        format!(
            "Organic compost {:.1}kg/cent for your {} soil (rain chance {}%).",
            dose, soil, p
        ),
    )
}
