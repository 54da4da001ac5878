use crate::args::Args;
use crate::roll::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

pub const DEFAULT_NAME_COLUMN: &str = "Nome Completo";
pub const DEFAULT_EMAIL_COLUMN: &str = "Email";
pub const DEFAULT_MINIMUM_PERCENT: f64 = 75.0;
pub const SUMMARY_FILE_NAME: &str = "attendance_summary.json";
pub const EXPORT_FILE_NAME: &str = "attendance_results.csv";

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "courseName")]
    pub course_name: Option<String>,
    #[serde(rename = "courseDate")]
    pub course_date: Option<String>,
    #[serde(rename = "courseWorkload")]
    pub course_workload: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workload: Option<String>,
    #[serde(rename = "totalClasses")]
    pub total_classes: String,
    #[serde(rename = "minimumPercent")]
    pub minimum_percent: String,
}

/// The kind of file a source is read from.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Provider {
    Csv,
    Excel,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    // Only used for the roster.
    #[serde(rename = "nameColumn")]
    pub name_column: Option<String>,
    #[serde(rename = "emailColumn")]
    pub email_column: Option<String>,
}

impl FileSource {
    pub fn from_path(path: &str) -> FileSource {
        FileSource {
            file_path: path.to_string(),
            ..FileSource::default()
        }
    }

    /// The provider, as given or inferred from the file extension.
    pub fn provider_kind(&self) -> RollResult<Provider> {
        let declared = self.provider.clone().map(|s| s.to_lowercase());
        let inferred = || {
            Path::new(&self.file_path)
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase())
        };
        match declared.or_else(inferred).as_deref() {
            Some("csv") => Ok(Provider::Csv),
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods" | "excel") => Ok(Provider::Excel),
            x => UnknownProviderSnafu {
                provider: x.unwrap_or(""),
                path: self.file_path.clone(),
            }
            .fail(),
        }
    }

    pub fn name_column(&self) -> &str {
        self.name_column.as_deref().unwrap_or(DEFAULT_NAME_COLUMN)
    }

    pub fn email_column(&self) -> &str {
        self.email_column.as_deref().unwrap_or(DEFAULT_EMAIL_COLUMN)
    }
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RollRules {
    #[serde(rename = "totalClasses")]
    pub total_classes: Option<i64>,
    #[serde(rename = "minimumPercent")]
    pub minimum_percent: Option<f64>,
    #[serde(rename = "matchThreshold")]
    pub match_threshold: Option<f64>,
    #[serde(rename = "matchDistance")]
    pub match_distance: Option<usize>,
    #[serde(rename = "collapseWhitespace")]
    pub collapse_whitespace: Option<bool>,
    #[serde(rename = "duplicateNameMode")]
    pub duplicate_name_mode: Option<String>,
}

impl RollRules {
    pub fn total_classes(&self) -> RollResult<i64> {
        self.total_classes.context(MissingInputSnafu {
            what: "total number of classes",
        })
    }

    pub fn minimum_percent(&self) -> f64 {
        self.minimum_percent.unwrap_or(DEFAULT_MINIMUM_PERCENT)
    }

    pub fn match_rules(&self) -> RollResult<MatchRules> {
        let defaults = MatchRules::DEFAULT_RULES;
        let duplicate_name_mode = match self.duplicate_name_mode.as_deref() {
            None | Some("firstRanked") => DuplicateNameMode::FirstRanked,
            Some("unassigned") => DuplicateNameMode::Unassigned,
            Some(x) => {
                return InvalidOptionSnafu {
                    name: "duplicateNameMode",
                    value: x,
                }
                .fail()
            }
        };
        let rules = MatchRules {
            threshold: self.match_threshold.unwrap_or(defaults.threshold),
            location: defaults.location,
            distance: self.match_distance.unwrap_or(defaults.distance),
            whitespace_mode: if self.collapse_whitespace.unwrap_or(false) {
                WhitespaceMode::Collapse
            } else {
                WhitespaceMode::Preserve
            },
            duplicate_name_mode,
        };
        rules.validate().context(InvalidRulesSnafu {})?;
        Ok(rules)
    }
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RollConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(rename = "rosterSource")]
    pub roster_source: Option<FileSource>,
    #[serde(rename = "attendanceSource")]
    pub attendance_source: Option<FileSource>,
    #[serde(default)]
    pub rules: RollRules,
}

impl RollConfig {
    /// Command-line values take precedence over the configuration file.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(p) = &args.roster {
            let previous = self.roster_source.take().unwrap_or_default();
            self.roster_source = Some(FileSource {
                file_path: p.clone(),
                provider: args.roster_type.clone(),
                ..previous
            });
        }
        if let Some(p) = &args.attendance {
            let previous = self.attendance_source.take().unwrap_or_default();
            self.attendance_source = Some(FileSource {
                file_path: p.clone(),
                provider: args.attendance_type.clone(),
                ..previous
            });
        }
        if let Some(roster) = self.roster_source.as_mut() {
            if args.name_column.is_some() {
                roster.name_column = args.name_column.clone();
            }
            if args.email_column.is_some() {
                roster.email_column = args.email_column.clone();
            }
        }
        if args.excel_worksheet_name.is_some() {
            for source in [self.roster_source.as_mut(), self.attendance_source.as_mut()]
                .into_iter()
                .flatten()
            {
                source.excel_worksheet_name = args.excel_worksheet_name.clone();
            }
        }
        let rules = &mut self.rules;
        if args.total_classes.is_some() {
            rules.total_classes = args.total_classes;
        }
        if args.minimum_percent.is_some() {
            rules.minimum_percent = args.minimum_percent;
        }
        if args.match_threshold.is_some() {
            rules.match_threshold = args.match_threshold;
        }
        if args.collapse_whitespace {
            rules.collapse_whitespace = Some(true);
        }
        if args.duplicate_name_mode.is_some() {
            rules.duplicate_name_mode = args.duplicate_name_mode.clone();
        }
    }

    pub fn roster_source(&self) -> RollResult<&FileSource> {
        self.roster_source
            .as_ref()
            .context(MissingInputSnafu { what: "roster" })
    }

    pub fn attendance_source(&self) -> RollResult<&FileSource> {
        self.attendance_source
            .as_ref()
            .context(MissingInputSnafu { what: "attendance" })
    }

    pub fn default_summary_path(&self) -> Option<String> {
        self.output_path(SUMMARY_FILE_NAME)
    }

    pub fn default_export_path(&self) -> Option<String> {
        self.output_path(EXPORT_FILE_NAME)
    }

    fn output_path(&self, file_name: &str) -> Option<String> {
        self.output_settings
            .output_directory
            .as_ref()
            .map(|d| resolve_path(Path::new(d), file_name))
    }
}

/// Reads a configuration file. The relative paths it contains are resolved
/// against the directory of the configuration file.
pub fn read_config(path: &str) -> BRollResult<RollConfig> {
    let config_str = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let mut config: RollConfig =
        serde_json::from_str(&config_str).context(ParsingJsonSnafu { path })?;
    debug!("read_config: {:?}", config);

    let root = Path::new(path).parent().unwrap_or_else(|| Path::new(""));
    for source in [config.roster_source.as_mut(), config.attendance_source.as_mut()]
        .into_iter()
        .flatten()
    {
        source.file_path = resolve_path(root, &source.file_path);
    }
    if let Some(d) = config.output_settings.output_directory.as_mut() {
        let resolved = resolve_path(root, d);
        *d = resolved;
    }
    Ok(config)
}

pub fn read_summary(path: &str) -> BRollResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(js)
}

fn resolve_path(root: &Path, file_path: &str) -> String {
    let p: PathBuf = root.join(file_path);
    p.as_path().display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn provider_is_inferred_from_the_extension() {
        assert_eq!(
            FileSource::from_path("a/roster.CSV").provider_kind().unwrap(),
            Provider::Csv
        );
        assert_eq!(
            FileSource::from_path("roster.xlsx").provider_kind().unwrap(),
            Provider::Excel
        );
        assert_eq!(
            FileSource::from_path("roster.ods").provider_kind().unwrap(),
            Provider::Excel
        );
        assert!(matches!(
            FileSource::from_path("roster.txt").provider_kind(),
            Err(RollError::UnknownProvider { .. })
        ));
        assert!(matches!(
            FileSource::from_path("roster").provider_kind(),
            Err(RollError::UnknownProvider { .. })
        ));
    }

    #[test]
    fn declared_provider_wins() {
        let fs = FileSource {
            provider: Some("csv".to_string()),
            ..FileSource::from_path("export.txt")
        };
        assert_eq!(fs.provider_kind().unwrap(), Provider::Csv);
    }

    #[test]
    fn config_defaults() {
        let config: RollConfig = serde_json::from_str(
            r#"{"rosterSource": {"filePath": "r.csv"}, "rules": {"totalClasses": 3}}"#,
        )
        .unwrap();
        let roster = config.roster_source().unwrap();
        assert_eq!(roster.name_column(), DEFAULT_NAME_COLUMN);
        assert_eq!(roster.email_column(), DEFAULT_EMAIL_COLUMN);
        assert!(config.attendance_source().is_err());
        assert_eq!(config.rules.total_classes().unwrap(), 3);
        assert_eq!(config.rules.minimum_percent(), DEFAULT_MINIMUM_PERCENT);
        assert_eq!(config.rules.match_rules().unwrap(), MatchRules::DEFAULT_RULES);
        assert_eq!(config.default_summary_path(), None);
    }

    #[test]
    fn rules_are_validated() {
        let rules = RollRules {
            duplicate_name_mode: Some("splitCredit".to_string()),
            ..RollRules::default()
        };
        assert!(matches!(
            rules.match_rules(),
            Err(RollError::InvalidOption { .. })
        ));
        let rules = RollRules {
            match_threshold: Some(3.0),
            ..RollRules::default()
        };
        assert!(matches!(
            rules.match_rules(),
            Err(RollError::InvalidRules { .. })
        ));
        let rules = RollRules {
            collapse_whitespace: Some(true),
            duplicate_name_mode: Some("unassigned".to_string()),
            ..RollRules::default()
        };
        let mr = rules.match_rules().unwrap();
        assert_eq!(mr.whitespace_mode, WhitespaceMode::Collapse);
        assert_eq!(mr.duplicate_name_mode, DuplicateNameMode::Unassigned);
        assert!(RollRules::default().total_classes().is_err());
    }

    #[test]
    fn command_line_overrides_the_file() {
        let mut config: RollConfig = serde_json::from_str(
            r#"{
                "rosterSource": {"filePath": "/data/r.xlsx", "nameColumn": "Nome"},
                "attendanceSource": {"filePath": "/data/a.xlsx"},
                "rules": {"totalClasses": 3, "minimumPercent": 50}
            }"#,
        )
        .unwrap();
        let args = Args::parse_from([
            "rollcall",
            "--roster",
            "other.csv",
            "--total-classes",
            "8",
            "--excel-worksheet-name",
            "Sheet2",
            "--collapse-whitespace",
        ]);
        config.apply_args(&args);

        let roster = config.roster_source().unwrap();
        assert_eq!(roster.file_path, "other.csv");
        assert_eq!(roster.name_column(), "Nome");
        assert_eq!(roster.excel_worksheet_name.as_deref(), Some("Sheet2"));
        let attendance = config.attendance_source().unwrap();
        assert_eq!(attendance.file_path, "/data/a.xlsx");
        assert_eq!(attendance.excel_worksheet_name.as_deref(), Some("Sheet2"));
        assert_eq!(config.rules.total_classes, Some(8));
        assert_eq!(config.rules.minimum_percent, Some(50.0));
        assert_eq!(config.rules.collapse_whitespace, Some(true));
    }
}
