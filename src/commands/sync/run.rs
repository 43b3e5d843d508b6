use super::*;

pub fn run(args: SyncArgs) -> Result<()> {
    let manifest = execute(&args, Utc::now())?;

    info!(
        run_id = %manifest.run_id,
        status = %manifest.status,
        pages_parsed = manifest.counts.pages_parsed,
        pages_skipped = manifest.counts.pages_skipped,
        text_updates_applied = manifest.counts.text_updates_applied,
        text_updates_missed = manifest.counts.text_updates_missed,
        records_merged = manifest.counts.records_merged,
        warnings = manifest.warnings.len(),
        "sync completed"
    );

    Ok(())
}

pub(super) struct ParsedPage {
    pub sheet: ParsedSheet,
    pub report: PageSyncReport,
}

#[derive(Default)]
pub(super) struct PageBatch {
    pub pages: Vec<ParsedPage>,
    pub counts: SyncCounts,
    pub warnings: Vec<String>,
}

pub(super) fn execute(args: &SyncArgs, started_ts: DateTime<Utc>) -> Result<SyncRunManifest> {
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));
    let manifest_path = args.manifest_path.clone().unwrap_or_else(|| {
        args.cache_root.join("manifests").join(format!(
            "sync_run_{}.json",
            utc_compact_string(started_ts)
        ))
    });

    info!(
        run_id = %run_id,
        grid_dir = %args.grid_dir.display(),
        dry_run = args.dry_run,
        "starting sync"
    );

    let catalog = SheetCatalog::discover(&args.grid_dir, &args.sheets)?;
    let mut batch = parse_pages(&catalog);

    let mut html = load_html(&args.html_target)?;
    if let Some(html) = html.as_mut() {
        for page in &batch.pages {
            let patched = apply_text_updates(html, &page.sheet.text_updates)?;
            batch.counts.text_updates_applied += patched.applied;
            batch.counts.text_updates_missed += patched.missed;
        }
    } else {
        let message = format!(
            "html target {} missing; text updates not applied",
            args.html_target.display()
        );
        warn!(path = %args.html_target.display(), "html target missing; text updates not applied");
        batch.warnings.push(message);
    }

    let mut state = load_page_data(&args.page_data)?;
    for page in &batch.pages {
        let (Some(record), Some(page_key)) = (&page.sheet.record, page.sheet.role.page_key())
        else {
            continue;
        };
        let merged = merge_page(state.page(&page_key), record);
        state.set_page(&page_key, merged);
        batch.counts.records_merged += 1;
    }

    if let Some(html) = html.as_mut()
        && let Some(page1) = state.page("page1")
        && !apply_page1_constant(html, page1)?
    {
        batch
            .warnings
            .push("PAGE1_DATA block not found in html target".to_string());
    }

    let status = if args.dry_run { "dry_run" } else { "completed" };
    let manifest = SyncRunManifest {
        manifest_version: MANIFEST_VERSION,
        run_id,
        status: status.to_string(),
        started_at,
        updated_at: now_utc_string(),
        command: render_sync_command(args),
        paths: SyncPaths {
            grid_dir: args.grid_dir.display().to_string(),
            html_target: args.html_target.display().to_string(),
            page_data_path: args.page_data.display().to_string(),
            manifest_path: manifest_path.display().to_string(),
        },
        counts: batch.counts,
        pages: batch.pages.into_iter().map(|page| page.report).collect(),
        warnings: batch.warnings,
    };

    if args.dry_run {
        info!(
            pages = manifest.pages.len(),
            state_pages = state.len(),
            "dry-run complete; nothing written"
        );
        return Ok(manifest);
    }

    write_page_data(&args.page_data, &state)?;
    info!(path = %args.page_data.display(), pages = state.len(), "wrote page data");

    if let Some(html) = &html {
        write_text_atomic(&args.html_target, html)?;
        info!(path = %args.html_target.display(), "wrote html target");
    }

    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote sync run manifest");

    Ok(manifest)
}

pub(super) fn parse_pages(catalog: &SheetCatalog) -> PageBatch {
    let mut batch = PageBatch::default();

    for role in PageRole::all() {
        let Some(path) = catalog.resolve(role) else {
            if role.is_generic() {
                debug!(page = %role, "no sheet for page; skipping");
            } else {
                warn!(page = %role, "no sheet for page; skipping");
                batch.warnings.push(format!("no sheet found for {role}"));
            }
            continue;
        };
        batch.counts.pages_resolved += 1;

        let (grid, sha256) = match load_sheet(path) {
            Ok(loaded) => loaded,
            Err(err) => {
                warn!(page = %role, path = %path.display(), error = %format!("{err:#}"), "failed to load sheet; skipping page");
                batch.warnings.push(format!("{role}: {err:#}"));
                batch.counts.pages_skipped += 1;
                continue;
            }
        };

        let sheet = parse_sheet(&grid, role);
        info!(
            page = %role,
            schema = sheet.schema.as_str(),
            updates = sheet.text_updates.len(),
            has_record = sheet.record.is_some(),
            "parsed sheet"
        );

        batch.counts.pages_parsed += 1;
        batch.counts.text_updates_planned += sheet.text_updates.len();

        let report = PageSyncReport {
            page_key: role.page_key().unwrap_or_else(|| role.to_string()),
            role: role.to_string(),
            sheet_path: path.display().to_string(),
            sha256,
            schema: sheet.schema.as_str().to_string(),
            text_updates: sheet.text_updates.len(),
            record_fields: sheet
                .record
                .as_ref()
                .map(|record| record.field_names())
                .unwrap_or_default(),
        };
        batch.pages.push(ParsedPage { sheet, report });
    }

    batch
}

fn load_sheet(path: &Path) -> Result<(Grid, String)> {
    let grid = Grid::load(path)?;
    let sha256 = sha256_file(path)?;
    Ok((grid, sha256))
}

fn load_html(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(html) => Ok(Some(html)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("failed to read {}", path.display())),
    }
}

pub(super) fn render_sync_command(args: &SyncArgs) -> String {
    let mut command = vec![
        "pagesync".to_string(),
        "sync".to_string(),
        "--grid-dir".to_string(),
        args.grid_dir.display().to_string(),
    ];

    for sheet in &args.sheets {
        command.push("--sheet".to_string());
        command.push(sheet.clone());
    }
    command.push("--html-target".to_string());
    command.push(args.html_target.display().to_string());
    command.push("--page-data".to_string());
    command.push(args.page_data.display().to_string());
    command.push("--cache-root".to_string());
    command.push(args.cache_root.display().to_string());
    if let Some(path) = &args.manifest_path {
        command.push("--manifest-path".to_string());
        command.push(path.display().to_string());
    }
    if args.dry_run {
        command.push("--dry-run".to_string());
    }

    command.join(" ")
}
