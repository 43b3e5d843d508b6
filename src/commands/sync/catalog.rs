use super::*;

#[derive(Debug, Clone, Default)]
pub struct SheetCatalog {
    by_title: BTreeMap<String, PathBuf>,
    overrides: BTreeMap<PageRole, PathBuf>,
}

impl SheetCatalog {
    pub fn discover(grid_dir: &Path, overrides: &[String]) -> Result<Self> {
        let mut catalog = Self::default();

        for path in discover_grids(grid_dir)? {
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            catalog.insert_titled(stem, path.clone());
        }

        for raw in overrides {
            let (role, path) = parse_override(raw)?;
            catalog.insert_override(role, path);
        }

        debug!(
            titled = catalog.by_title.len(),
            overrides = catalog.overrides.len(),
            "built sheet catalog"
        );
        Ok(catalog)
    }

    pub fn insert_titled(&mut self, title: &str, path: PathBuf) {
        self.by_title.insert(normalize_title(title), path);
    }

    pub fn insert_override(&mut self, role: PageRole, path: PathBuf) {
        self.overrides.insert(role, path);
    }

    pub fn resolve(&self, role: PageRole) -> Option<&Path> {
        if let Some(path) = self.overrides.get(&role) {
            return Some(path.as_path());
        }

        title_candidates(role)
            .iter()
            .find_map(|title| self.by_title.get(&normalize_title(title)))
            .map(PathBuf::as_path)
    }
}

pub fn title_candidates(role: PageRole) -> Vec<String> {
    match role {
        PageRole::Cover => vec!["cover".to_string(), "封面".to_string()],
        PageRole::Page1 => vec!["page1".to_string(), "1".to_string()],
        PageRole::Page2 => vec!["page2".to_string(), "2".to_string()],
        PageRole::Generic(number) => vec![
            number.to_string(),
            format!("Page{number}"),
            format!("page{number}"),
        ],
        PageRole::Unknown => Vec::new(),
    }
}

fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

fn parse_override(raw: &str) -> Result<(PageRole, PathBuf)> {
    let Some((tag, path)) = raw.split_once('=') else {
        bail!("invalid --sheet value {raw:?}; expected ROLE=PATH");
    };

    let role = PageRole::from_tag(tag);
    if role == PageRole::Unknown {
        bail!("unknown page role {tag:?} in --sheet {raw:?}");
    }

    let path = path.trim();
    if path.is_empty() {
        bail!("missing sheet path in --sheet {raw:?}");
    }

    Ok((role, PathBuf::from(path)))
}

fn discover_grids(grid_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(grid_dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!(grid_dir = %grid_dir.display(), "grid directory missing; only --sheet overrides apply");
            return Ok(Vec::new());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", grid_dir.display()));
        }
    };

    let mut grids = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", grid_dir.display()))?;
        let path = entry.path();

        if !entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", path.display()))?
            .is_file()
        {
            continue;
        }

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            grids.push(path);
        }
    }

    grids.sort();
    Ok(grids)
}
