//! Advisory service: answers farmer queries and keeps their history
//!
//! Replies come from the rule engine unless LLM inference is enabled. Any
//! inference failure falls back to the rule engine, and weather failures fall
//! back to fixed values, so asking never fails once the query is valid.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared::{
    match_category, validate_query, AdvisoryCategory, AdvisoryEngine, ChatLog, Farmer, Language,
    QueryRecord, WeatherBanner, WeatherSnapshot,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::{AdvisoryPrompt, InferenceProvider};
use crate::services::store::FarmerStore;
use crate::services::weather::WeatherService;

pub const MAX_HISTORY_LIMIT: i64 = 50;

/// Which path produced a reply
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdviceSource {
    Rules,
    Inference,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdviceResponse {
    pub reply: String,
    pub source: AdviceSource,
    pub category: Option<AdvisoryCategory>,
    pub banner: Option<WeatherBanner>,
    pub weather: WeatherSnapshot,
    pub weather_fallback: bool,
}

#[derive(Clone)]
pub struct AdvisoryService {
    store: Arc<dyn FarmerStore>,
    weather: WeatherService,
    engine: AdvisoryEngine,
    inference: Option<Arc<dyn InferenceProvider>>,
    history_limit: i64,
}

impl AdvisoryService {
    pub fn new(
        store: Arc<dyn FarmerStore>,
        weather: WeatherService,
        engine: AdvisoryEngine,
        inference: Option<Arc<dyn InferenceProvider>>,
        history_limit: i64,
    ) -> Self {
        Self {
            store,
            weather,
            engine,
            inference,
            history_limit: history_limit.clamp(1, MAX_HISTORY_LIMIT),
        }
    }

    /// Answer a query for a farmer and record it in their history
    pub async fn ask(
        &self,
        farmer: &Farmer,
        query: &str,
        language: Language,
    ) -> AppResult<AdviceResponse> {
        let query = query.trim();
        validate_query(query).map_err(|m| AppError::invalid_field("query", m))?;

        let view = self.engine.view(Some(&farmer.profile));
        let reading = self.weather.current_or_fallback(view.coordinates()).await;
        let banner = reading
            .measured()
            .and_then(|snapshot| self.engine.banner(Some(&farmer.profile), snapshot));

        let (reply, source, category) = match self.infer(farmer, query, language).await {
            Some(text) => (text, AdviceSource::Inference, match_category(query)),
            None => {
                let reply = self
                    .engine
                    .reply(query, Some(&farmer.profile), reading.measured());
                (reply.render(), AdviceSource::Rules, reply.category)
            }
        };

        if let Err(e) = self.store.save_query(farmer.id, query, &reply).await {
            tracing::warn!(farmer_id = %farmer.id, error = %e, "Failed to save query history");
        }

        tracing::debug!(
            farmer_id = %farmer.id,
            source = ?source,
            category = ?category,
            weather_fallback = reading.fallback,
            "Advice produced"
        );

        Ok(AdviceResponse {
            reply,
            source,
            category,
            banner,
            weather: reading.snapshot,
            weather_fallback: reading.fallback,
        })
    }

    /// LLM answer, or `None` when inference is disabled or fails
    async fn infer(&self, farmer: &Farmer, query: &str, language: Language) -> Option<String> {
        let inference = self.inference.as_ref()?;
        let view = self.engine.view(Some(&farmer.profile));

        let prompt = AdvisoryPrompt {
            query: query.to_string(),
            crop: view.crop(Language::English).to_string(),
            location: view.location().to_string(),
            soil: view.soil().to_string(),
            farm_size_acres: view.farm_size_acres(),
        };

        let english = match inference.complete(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "Inference failed, using rule engine");
                return None;
            }
        };

        if language == Language::English {
            return Some(english);
        }

        match inference.translate_to_malayalam(&english).await {
            Ok(translated) => Some(translated),
            Err(e) => {
                tracing::warn!(error = %e, "Translation failed, returning English advice");
                Some(english)
            }
        }
    }

    /// Recent queries, newest first
    pub async fn history(&self, farmer_id: Uuid, limit: Option<i64>) -> AppResult<Vec<QueryRecord>> {
        let limit = limit
            .unwrap_or(self.history_limit)
            .clamp(1, MAX_HISTORY_LIMIT);
        self.store.list_recent_queries(farmer_id, limit).await
    }

    /// Recent history as a chronological chat log
    pub async fn chat_log(&self, farmer_id: Uuid, limit: Option<i64>) -> AppResult<ChatLog> {
        let records = self.history(farmer_id, limit).await?;
        Ok(ChatLog::from_history(&records))
    }

    /// Ask and append both turns to a caller-owned chat log
    pub async fn converse(
        &self,
        log: &mut ChatLog,
        farmer: &Farmer,
        query: &str,
        language: Language,
    ) -> AppResult<AdviceResponse> {
        let response = self.ask(farmer, query, language).await?;
        log.push_user(query.trim());
        log.push_assistant(response.reply.clone());
        Ok(response)
    }
}
