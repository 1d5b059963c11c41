//! One method per OpenDota endpoint.
//!
//! Every method only formats the endpoint path and its parameters and hands
//! them to [`Client::call`]; pacing, retries and error handling all happen
//! there. Methods taking `params` accept the optional filters documented at
//! <https://docs.opendota.com/> (e.g. `limit`, `hero_id`, `date`).

use crate::{CallMode, Client, Params, Payload, RequestMethod, Transport};

/// Ordering of `publicMatches` results by average MMR
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MmrSort {
    /// Keep the API's ordering (newest first)
    None,
    Ascending,
    Descending,
}

impl Default for MmrSort {
    fn default() -> Self {
        MmrSort::None
    }
}

/// Parameters for endpoints paginated by `less_than_match_id`
fn less_than(match_id: Option<u64>) -> Params {
    let mut params = Params::new();
    if let Some(id) = match_id {
        params.insert("less_than_match_id", id);
    }
    params
}

impl<T: Transport> Client<T> {
    async fn get(&mut self, endpoint: &str, params: Params, mode: CallMode) -> Option<Payload> {
        self.call(endpoint, mode, params, RequestMethod::Get).await
    }

    async fn post(&mut self, endpoint: &str, mode: CallMode) -> Option<Payload> {
        self.call(endpoint, mode, Params::new(), RequestMethod::Post)
            .await
    }

    // Matches

    /// GET /matches/{match_id}
    pub async fn match_details(&mut self, match_id: u64, mode: CallMode) -> Option<Payload> {
        self.get(&format!("matches/{}", match_id), Params::new(), mode)
            .await
    }

    // Players

    /// GET /playersByRank
    pub async fn players_by_rank(&mut self, mode: CallMode) -> Option<Payload> {
        self.get("playersByRank", Params::new(), mode).await
    }

    /// GET /players/{account_id}
    pub async fn player(&mut self, account_id: u64, mode: CallMode) -> Option<Payload> {
        self.get(&format!("players/{}", account_id), Params::new(), mode)
            .await
    }

    /// GET /players/{account_id}/wl
    pub async fn player_winloss(
        &mut self,
        account_id: u64,
        params: Params,
        mode: CallMode,
    ) -> Option<Payload> {
        self.get(&format!("players/{}/wl", account_id), params, mode)
            .await
    }

    /// GET /players/{account_id}/recentMatches
    pub async fn player_recent_matches(
        &mut self,
        account_id: u64,
        mode: CallMode,
    ) -> Option<Payload> {
        let endpoint = format!("players/{}/recentMatches", account_id);
        self.get(&endpoint, Params::new(), mode).await
    }

    /// GET /players/{account_id}/matches
    pub async fn player_matches(
        &mut self,
        account_id: u64,
        params: Params,
        mode: CallMode,
    ) -> Option<Payload> {
        self.get(&format!("players/{}/matches", account_id), params, mode)
            .await
    }

    /// GET /players/{account_id}/heroes
    pub async fn player_heroes(
        &mut self,
        account_id: u64,
        params: Params,
        mode: CallMode,
    ) -> Option<Payload> {
        self.get(&format!("players/{}/heroes", account_id), params, mode)
            .await
    }

    /// GET /players/{account_id}/peers
    pub async fn player_peers(
        &mut self,
        account_id: u64,
        params: Params,
        mode: CallMode,
    ) -> Option<Payload> {
        self.get(&format!("players/{}/peers", account_id), params, mode)
            .await
    }

    /// GET /players/{account_id}/pros
    pub async fn player_pros(
        &mut self,
        account_id: u64,
        params: Params,
        mode: CallMode,
    ) -> Option<Payload> {
        self.get(&format!("players/{}/pros", account_id), params, mode)
            .await
    }

    /// GET /players/{account_id}/totals
    pub async fn player_totals(
        &mut self,
        account_id: u64,
        params: Params,
        mode: CallMode,
    ) -> Option<Payload> {
        self.get(&format!("players/{}/totals", account_id), params, mode)
            .await
    }

    /// GET /players/{account_id}/counts
    pub async fn player_counts(
        &mut self,
        account_id: u64,
        params: Params,
        mode: CallMode,
    ) -> Option<Payload> {
        self.get(&format!("players/{}/counts", account_id), params, mode)
            .await
    }

    /// GET /players/{account_id}/histograms/{field}
    ///
    /// An empty `field` requests the bare `histograms` resource.
    pub async fn player_histograms(
        &mut self,
        account_id: u64,
        field: &str,
        params: Params,
        mode: CallMode,
    ) -> Option<Payload> {
        let endpoint = if field.is_empty() {
            format!("players/{}/histograms", account_id)
        } else {
            format!("players/{}/histograms/{}", account_id, field)
        };
        self.get(&endpoint, params, mode).await
    }

    /// GET /players/{account_id}/wardmap
    pub async fn player_wardmap(
        &mut self,
        account_id: u64,
        params: Params,
        mode: CallMode,
    ) -> Option<Payload> {
        self.get(&format!("players/{}/wardmap", account_id), params, mode)
            .await
    }

    /// GET /players/{account_id}/wordcloud
    pub async fn player_wordcloud(
        &mut self,
        account_id: u64,
        params: Params,
        mode: CallMode,
    ) -> Option<Payload> {
        self.get(&format!("players/{}/wordcloud", account_id), params, mode)
            .await
    }

    /// GET /players/{account_id}/ratings
    pub async fn player_ratings(&mut self, account_id: u64, mode: CallMode) -> Option<Payload> {
        self.get(&format!("players/{}/ratings", account_id), Params::new(), mode)
            .await
    }

    /// GET /players/{account_id}/rankings
    pub async fn player_rankings(&mut self, account_id: u64, mode: CallMode) -> Option<Payload> {
        self.get(&format!("players/{}/rankings", account_id), Params::new(), mode)
            .await
    }

    /// POST /players/{account_id}/refresh
    ///
    /// Asks the API to refresh the player's match history.
    pub async fn player_refresh(&mut self, account_id: u64, mode: CallMode) -> Option<Payload> {
        self.post(&format!("players/{}/refresh", account_id), mode)
            .await
    }

    // Pro players, pro/public/parsed matches

    /// GET /proPlayers
    pub async fn pro_players(&mut self, mode: CallMode) -> Option<Payload> {
        self.get("proPlayers", Params::new(), mode).await
    }

    /// GET /proMatches, optionally only matches older than
    /// `less_than_match_id`
    pub async fn pro_matches(
        &mut self,
        less_than_match_id: Option<u64>,
        mode: CallMode,
    ) -> Option<Payload> {
        self.get("proMatches", less_than(less_than_match_id), mode)
            .await
    }

    /// GET /publicMatches
    pub async fn public_matches(
        &mut self,
        less_than_match_id: Option<u64>,
        sort: MmrSort,
        mode: CallMode,
    ) -> Option<Payload> {
        let mut params = less_than(less_than_match_id);
        match sort {
            MmrSort::None => {}
            MmrSort::Ascending => params.insert("mmr_ascending", ""),
            MmrSort::Descending => params.insert("mmr_descending", ""),
        }
        self.get("publicMatches", params, mode).await
    }

    /// GET /parsedMatches
    pub async fn parsed_matches(
        &mut self,
        less_than_match_id: Option<u64>,
        mode: CallMode,
    ) -> Option<Payload> {
        self.get("parsedMatches", less_than(less_than_match_id), mode)
            .await
    }

    // Explorer, metadata, search

    /// GET /explorer?sql={sql}
    ///
    /// Runs a read-only SQL query against the OpenDota database. An empty
    /// query is refused without contacting the API.
    pub async fn explorer(&mut self, sql: &str, mode: CallMode) -> Option<Payload> {
        if sql.trim().is_empty() {
            return self.reject("explorer query is empty");
        }
        self.get("explorer", Params::new().with("sql", sql), mode)
            .await
    }

    /// GET /metadata
    pub async fn metadata(&mut self, mode: CallMode) -> Option<Payload> {
        self.get("metadata", Params::new(), mode).await
    }

    /// GET /distributions
    pub async fn distributions(&mut self, mode: CallMode) -> Option<Payload> {
        self.get("distributions", Params::new(), mode).await
    }

    /// GET /search?q={query}
    pub async fn search(&mut self, query: &str, mode: CallMode) -> Option<Payload> {
        if query.trim().is_empty() {
            return self.reject("search query is empty");
        }
        self.get("search", Params::new().with("q", query), mode).await
    }

    /// GET /rankings?hero_id={hero_id}
    pub async fn rankings(&mut self, hero_id: u32, mode: CallMode) -> Option<Payload> {
        self.get("rankings", Params::new().with("hero_id", hero_id), mode)
            .await
    }

    /// GET /benchmarks?hero_id={hero_id}
    pub async fn benchmarks(&mut self, hero_id: u32, mode: CallMode) -> Option<Payload> {
        self.get("benchmarks", Params::new().with("hero_id", hero_id), mode)
            .await
    }

    // Service status

    /// GET /status
    pub async fn status(&mut self, mode: CallMode) -> Option<Payload> {
        self.get("status", Params::new(), mode).await
    }

    /// GET /health
    pub async fn health(&mut self, mode: CallMode) -> Option<Payload> {
        self.get("health", Params::new(), mode).await
    }

    // Parse jobs

    /// GET /request/{job_id}: state of a parse job
    pub async fn request_status(&mut self, job_id: &str, mode: CallMode) -> Option<Payload> {
        self.get(&format!("request/{}", job_id), Params::new(), mode)
            .await
    }

    /// POST /request/{match_id}: submit a parse job
    pub async fn request_match(&mut self, match_id: u64, mode: CallMode) -> Option<Payload> {
        self.post(&format!("request/{}", match_id), mode).await
    }

    // Heroes

    /// GET /heroes
    pub async fn heroes(&mut self, mode: CallMode) -> Option<Payload> {
        self.get("heroes", Params::new(), mode).await
    }

    /// GET /heroes/{hero_id}/matches
    pub async fn hero_matches(&mut self, hero_id: u32, mode: CallMode) -> Option<Payload> {
        self.get(&format!("heroes/{}/matches", hero_id), Params::new(), mode)
            .await
    }

    /// GET /heroes/{hero_id}/matchups
    pub async fn hero_matchups(&mut self, hero_id: u32, mode: CallMode) -> Option<Payload> {
        self.get(&format!("heroes/{}/matchups", hero_id), Params::new(), mode)
            .await
    }

    /// GET /heroes/{hero_id}/durations
    pub async fn hero_durations(&mut self, hero_id: u32, mode: CallMode) -> Option<Payload> {
        self.get(&format!("heroes/{}/durations", hero_id), Params::new(), mode)
            .await
    }

    /// GET /heroes/{hero_id}/players
    pub async fn hero_players(&mut self, hero_id: u32, mode: CallMode) -> Option<Payload> {
        self.get(&format!("heroes/{}/players", hero_id), Params::new(), mode)
            .await
    }

    /// GET /heroStats
    pub async fn hero_stats(&mut self, mode: CallMode) -> Option<Payload> {
        self.get("heroStats", Params::new(), mode).await
    }

    // Leagues and teams

    /// GET /leagues
    pub async fn leagues(&mut self, mode: CallMode) -> Option<Payload> {
        self.get("leagues", Params::new(), mode).await
    }

    /// GET /teams
    pub async fn teams(&mut self, mode: CallMode) -> Option<Payload> {
        self.get("teams", Params::new(), mode).await
    }

    /// GET /teams/{team_id}
    pub async fn team(&mut self, team_id: u64, mode: CallMode) -> Option<Payload> {
        self.get(&format!("teams/{}", team_id), Params::new(), mode)
            .await
    }

    /// GET /teams/{team_id}/matches
    pub async fn team_matches(&mut self, team_id: u64, mode: CallMode) -> Option<Payload> {
        self.get(&format!("teams/{}/matches", team_id), Params::new(), mode)
            .await
    }

    /// GET /teams/{team_id}/players
    pub async fn team_players(&mut self, team_id: u64, mode: CallMode) -> Option<Payload> {
        self.get(&format!("teams/{}/players", team_id), Params::new(), mode)
            .await
    }

    /// GET /teams/{team_id}/heroes
    pub async fn team_heroes(&mut self, team_id: u64, mode: CallMode) -> Option<Payload> {
        self.get(&format!("teams/{}/heroes", team_id), Params::new(), mode)
            .await
    }

    // Replays, records, live games

    /// GET /replays?match_id={match_id}
    pub async fn replays(&mut self, match_id: u64, mode: CallMode) -> Option<Payload> {
        self.get("replays", Params::new().with("match_id", match_id), mode)
            .await
    }

    /// GET /records/{field}
    pub async fn records(&mut self, field: &str, mode: CallMode) -> Option<Payload> {
        self.get(&format!("records/{}", field), Params::new(), mode)
            .await
    }

    /// GET /live
    pub async fn live(&mut self, mode: CallMode) -> Option<Payload> {
        self.get("live", Params::new(), mode).await
    }

    // Scenarios

    /// GET /scenarios/itemTimings
    pub async fn scenarios_item_timings(
        &mut self,
        item: &str,
        hero_id: u32,
        mode: CallMode,
    ) -> Option<Payload> {
        let params = Params::new().with("item", item).with("hero_id", hero_id);
        self.get("scenarios/itemTimings", params, mode).await
    }

    /// GET /scenarios/laneRoles
    pub async fn scenarios_lane_roles(
        &mut self,
        lane_role: u8,
        hero_id: u32,
        mode: CallMode,
    ) -> Option<Payload> {
        let params = Params::new()
            .with("lane_role", lane_role)
            .with("hero_id", hero_id);
        self.get("scenarios/laneRoles", params, mode).await
    }

    /// GET /scenarios/misc
    pub async fn scenarios_misc(&mut self, scenario: &str, mode: CallMode) -> Option<Payload> {
        let params = Params::new().with("scenario", scenario);
        self.get("scenarios/misc", params, mode).await
    }

    // Schema, admin, constants

    /// GET /schema
    pub async fn schema(&mut self, mode: CallMode) -> Option<Payload> {
        self.get("schema", Params::new(), mode).await
    }

    /// GET /admin/apiMetrics
    pub async fn api_metrics(&mut self, mode: CallMode) -> Option<Payload> {
        self.get("admin/apiMetrics", Params::new(), mode).await
    }

    /// GET /findMatches
    ///
    /// Matches where the heroes of `team_a` played against the heroes of
    /// `team_b`. Each hero id is sent as its own `teamA`/`teamB` value.
    pub async fn find_matches(
        &mut self,
        team_a: &[u32],
        team_b: &[u32],
        mode: CallMode,
    ) -> Option<Payload> {
        if team_a.is_empty() && team_b.is_empty() {
            return self.reject("findMatches needs at least one hero");
        }
        let mut params = Params::new();
        for hero in team_a {
            params.append("teamA", hero);
        }
        for hero in team_b {
            params.append("teamB", hero);
        }
        self.get("findMatches", params, mode).await
    }

    /// GET /constants/{resource}
    pub async fn constants(&mut self, resource: &str, mode: CallMode) -> Option<Payload> {
        self.get(&format!("constants/{}", resource), Params::new(), mode)
            .await
    }
}
