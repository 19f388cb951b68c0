//! Client for the managed GraphQL store holding games and per-player records.

mod queries;

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::model::{GameRecord, PlayerGameRecord};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const USER_AGENT: &str = "courtside-sentiment/0.1";

#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

impl GraphQlResponse {
    pub fn parse(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| Error::parse(format!("parse GraphQL response: {e}")))
    }

    /// The raw value of `field` under `data`. Errors in the envelope win over data.
    fn field(self, field: &str) -> Result<serde_json::Value> {
        if let Some(errors) = self.errors.filter(|e| !e.is_empty()) {
            let joined: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(Error::graphql(joined.join("; ")));
        }
        let mut data = self
            .data
            .ok_or_else(|| Error::parse("GraphQL response missing data"))?;
        data.remove(field)
            .ok_or_else(|| Error::parse(format!("GraphQL response missing {field}")))
    }
}

/// Decode a list field. A `null` list decodes as empty.
pub fn decode_list<T: DeserializeOwned>(body: &str, field: &str) -> Result<Vec<T>> {
    let value = GraphQlResponse::parse(body)?.field(field)?;
    if value.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(value).map_err(|e| Error::parse(format!("decode {field}: {e}")))
}

/// Decode a single-object field that may be `null`.
pub fn decode_optional<T: DeserializeOwned>(body: &str, field: &str) -> Result<Option<T>> {
    let value = GraphQlResponse::parse(body)?.field(field)?;
    if value.is_null() {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| Error::parse(format!("decode {field}: {e}")))
}

pub struct StoreClient {
    http: HttpClient,
    endpoint: String,
    api_key: String,
}

impl StoreClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(USER_AGENT)?,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        if config.endpoint.trim().is_empty() {
            return Err(Error::config("store endpoint not set"));
        }
        let api_key = config.api_key().ok_or_else(|| {
            Error::config(format!(
                "{} not set. Export it or add it to .env",
                config.api_key_env
            ))
        })?;
        Self::new(config.endpoint.clone(), api_key)
    }

    async fn execute(&self, operation: &str, query: &str, variables: serde_json::Value) -> Result<String> {
        debug!(operation, "GraphQL request");
        let request = GraphQlRequest { query, variables };
        self.http
            .post_json(&self.endpoint, &request, &[("x-api-key", self.api_key.as_str())])
            .await
    }

    pub async fn list_games(&self) -> Result<Vec<GameRecord>> {
        let body = self
            .execute("listGames", queries::LIST_GAMES, serde_json::json!({}))
            .await?;
        let games: Vec<GameRecord> = decode_list(&body, "listGames")?;
        info!(count = games.len(), "Fetched games");
        Ok(games)
    }

    pub async fn get_game_metadata(&self, pk: &str) -> Result<Option<GameRecord>> {
        let body = self
            .execute(
                "getGameMetadata",
                queries::GET_GAME_METADATA,
                serde_json::json!({ "PK": pk }),
            )
            .await?;
        decode_optional(&body, "getGameMetadata")
    }

    pub async fn get_game_players(&self, pk: &str) -> Result<Vec<PlayerGameRecord>> {
        let body = self
            .execute(
                "getGamePlayers",
                queries::GET_GAME_PLAYERS,
                serde_json::json!({ "PK": pk }),
            )
            .await?;
        let players: Vec<PlayerGameRecord> = decode_list(&body, "getGamePlayers")?;
        info!(game = pk, count = players.len(), "Fetched game players");
        Ok(players)
    }

    pub async fn get_player_history(&self, player_name: &str, limit: u32) -> Result<Vec<PlayerGameRecord>> {
        let body = self
            .execute(
                "getPlayerHistory",
                queries::GET_PLAYER_HISTORY,
                serde_json::json!({ "player_name": player_name, "limit": limit }),
            )
            .await?;
        let history: Vec<PlayerGameRecord> = decode_list(&body, "getPlayerHistory")?;
        info!(player = player_name, count = history.len(), "Fetched player history");
        Ok(history)
    }

    pub async fn list_season_stats(&self, limit: u32) -> Result<Vec<PlayerGameRecord>> {
        let body = self
            .execute(
                "listSeasonStats",
                queries::LIST_SEASON_STATS,
                serde_json::json!({ "limit": limit }),
            )
            .await?;
        let records: Vec<PlayerGameRecord> = decode_list(&body, "listSeasonStats")?;
        info!(count = records.len(), "Fetched season stats");
        Ok(records)
    }
}
