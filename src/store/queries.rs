// Field selections mirror `GameRecord` and `PlayerGameRecord`.

pub const LIST_GAMES: &str = r#"
query ListGames {
  listGames {
    PK SK date permalink home away home_pts away_pts team_ids
  }
}
"#;

pub const GET_GAME_METADATA: &str = r#"
query GetGameMetadata($PK: String!) {
  getGameMetadata(PK: $PK) {
    PK SK date permalink home away home_pts away_pts team_ids
  }
}
"#;

pub const GET_GAME_PLAYERS: &str = r#"
query GetGamePlayers($PK: String!) {
  getGamePlayers(PK: $PK) {
    PK SK player_name date minutes points plusminus assists rebounds steals blocks
    fga fgm fta ftm fg3a fg3m efg ts sentiment mentions
  }
}
"#;

pub const GET_PLAYER_HISTORY: &str = r#"
query GetPlayerHistory($player_name: String!, $limit: Int) {
  getPlayerHistory(player_name: $player_name, limit: $limit) {
    PK SK player_name date minutes points plusminus assists rebounds steals blocks
    fga fgm fta ftm fg3a fg3m efg ts sentiment mentions
  }
}
"#;

pub const LIST_SEASON_STATS: &str = r#"
query ListSeasonStats($limit: Int) {
  listSeasonStats(limit: $limit) {
    PK SK player_name date minutes points plusminus assists rebounds steals blocks
    fga fgm fta ftm fg3a fg3m efg ts sentiment mentions
  }
}
"#;
