use crate::draft::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "draftName")]
    pub draft_name: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "summaryFile")]
    pub summary_file: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct InputFile {
    #[serde(rename = "filePath")]
    pub file_path: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DraftRulesConfig {
    #[serde(rename = "teamSize")]
    _team_size: Option<JSValue>,
    #[serde(rename = "selectSize")]
    _select_size: Option<JSValue>,
    #[serde(rename = "randomSeed")]
    _random_seed: Option<JSValue>,
    #[serde(rename = "tiebreakMode")]
    pub tiebreak_mode: Option<String>,
}

impl DraftRulesConfig {
    pub fn team_size(&self) -> DrResult<Option<u32>> {
        read_js_u32(&self._team_size, "teamSize")
    }

    pub fn select_size(&self) -> DrResult<Option<u32>> {
        read_js_u32(&self._select_size, "selectSize")
    }

    pub fn random_seed(&self) -> DrResult<Option<u64>> {
        read_js_int(&self._random_seed, "randomSeed")
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DraftConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: Option<OutputSettings>,
    #[serde(rename = "inputFile")]
    pub input_file: Option<InputFile>,
    pub rules: Option<DraftRulesConfig>,
}

pub fn read_config(path: &str) -> DrResult<DraftConfig> {
    let config_str = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    parse_config(&config_str)
}

pub fn parse_config(config_str: &str) -> DrResult<DraftConfig> {
    let config: DraftConfig = serde_json::from_str(config_str).context(ParsingJsonSnafu {})?;
    debug!("parse_config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: &str) -> DrResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

// Numbers may be written as JSON numbers or as strings.
fn read_js_int(x: &Option<JSValue>, name: &str) -> DrResult<Option<u64>> {
    match x {
        None | Some(JSValue::Null) => Ok(None),
        Some(JSValue::Number(n)) => n
            .as_u64()
            .map(Some)
            .context(ParsingJsonNumberSnafu { name }),
        Some(JSValue::String(s)) => s
            .trim()
            .parse::<u64>()
            .ok()
            .map(Some)
            .context(ParsingJsonNumberSnafu { name }),
        _ => ParsingJsonNumberSnafu { name }.fail(),
    }
}

fn read_js_u32(x: &Option<JSValue>, name: &str) -> DrResult<Option<u32>> {
    match read_js_int(x, name)? {
        Some(v) => u32::try_from(v)
            .ok()
            .map(Some)
            .context(ParsingJsonNumberSnafu { name }),
        None => Ok(None),
    }
}
