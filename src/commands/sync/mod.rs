use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::cli::SyncArgs;
use crate::extract::{PageRole, ParsedSheet, parse_sheet};
use crate::grid::Grid;
use crate::merge::merge_page;
use crate::model::{PageSyncReport, SyncCounts, SyncPaths, SyncRunManifest};
use crate::patch::{apply_page1_constant, apply_text_updates};
use crate::state::{load_page_data, write_page_data};
use crate::util::{
    now_utc_string, sha256_file, utc_compact_string, write_json_pretty, write_text_atomic,
};

const MANIFEST_VERSION: u32 = 1;

mod catalog;
mod run;

pub use catalog::SheetCatalog;
pub use run::run;

use run::*;
