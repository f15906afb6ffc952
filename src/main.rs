//! npcforge CLI - biome-aware NPC generator.
//!
//! Loads the archetype and trope catalogs, resolves tropes to archetypes
//! (cached in the mapping artifact) and generates NPC profiles from terrain
//! maps.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{miette, IntoDiagnostic, Result, WrapErr};

use npcforge::config::{AppConfig, ConfigError};
use npcforge::core::catalog::{ArchetypeIndex, ArchetypeParent, TropeChild};
use npcforge::core::embedding::create_provider;
use npcforge::core::export::write_npc;
use npcforge::core::ingest::{ArchetypeLoader, TerrainLoader, TropeLoader};
use npcforge::core::logging::{self, print_info, print_panel, print_success, print_warning};
use npcforge::core::mapping::{MappingError, MappingStore, MappingTable, TropeResolver};
use npcforge::core::npc_gen::NpcGenerator;
use npcforge::core::rules::{BiomeCode, RuleSet};

/// Map file, target biome and output file for the `showcase` command.
const SHOWCASE: [(&str, BiomeCode, &str); 4] = [
    ("Tokyo_MegaCity.json", 50, "tokyo_urban_npc.json"),
    ("Yakutsk_FrozenTundra.json", 100, "yakutsk_tundra_npc.json"),
    ("Manaus_DeepJungle.json", 10, "amazon_wildlands_npc.json"),
    ("McMurdo_DryValleys.json", 60, "wasteland_scavenger_npc.json"),
];

const SHOWCASE_SEED: u64 = 42;

/// Biome-aware NPC generator.
#[derive(Parser)]
#[command(name = "npcforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: ~/.config/npcforge/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Project root holding the catalogs and terrain folder.
    #[arg(long, global = true)]
    project_root: Option<PathBuf>,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load catalogs and a terrain map and print a summary.
    Inspect {
        /// Terrain map to inspect (default: Tokyo_MegaCity.json, else the whole folder).
        #[arg(long)]
        map: Option<PathBuf>,
    },

    /// Build or reload the trope → archetype mapping artifact.
    Map {
        /// Rebuild even if the artifact exists.
        #[arg(long)]
        force: bool,
    },

    /// Generate one NPC at a map coordinate.
    Generate {
        /// Terrain map file.
        #[arg(long)]
        map: PathBuf,

        #[arg(long, allow_hyphen_values = true)]
        x: i64,

        #[arg(long, allow_hyphen_values = true)]
        y: i64,

        /// Random seed (default from config).
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output file (default: <output_dir>/<npc_id>.json).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Generate the example NPCs for the showcase maps.
    Showcase,

    /// Validate and print the rule tables.
    Rules,
}

/// Catalogs and rules shared by the commands.
struct Workspace {
    config: AppConfig,
    parents: Vec<ArchetypeParent>,
    index: ArchetypeIndex,
    tropes: Vec<TropeChild>,
    rules: RuleSet,
}

impl Workspace {
    fn load(config: AppConfig) -> Result<Self> {
        let parents = ArchetypeLoader
            .load(config.data.archetypes_path())
            .into_diagnostic()
            .wrap_err("Could not load the parent archetype catalog")?;
        let tropes = TropeLoader
            .load(config.data.tropes_path())
            .into_diagnostic()
            .wrap_err("Could not load the child trope catalog")?;
        let rules = load_rules(&config)?;
        let index = ArchetypeIndex::from_parents(parents.iter().cloned());

        for (biome, id) in rules.unknown_archetypes(&index) {
            log::warn!("Archetype pool for biome {biome} names unknown archetype {id}");
        }

        Ok(Self {
            config,
            parents,
            index,
            tropes,
            rules,
        })
    }

    /// Reuse or build the mapping artifact and warn if it no longer fits the
    /// catalogs.
    async fn mapping(&self, force: bool) -> Result<MappingTable> {
        let store = MappingStore::new(self.config.data.mapping_path())
            .with_threshold(self.config.mapping.threshold);
        let table = store
            .load_or_build(force, || build_mapping(&self.config, &self.parents, &self.tropes))
            .await
            .into_diagnostic()
            .wrap_err("Could not build the archetype mapping")?;

        let problems = table.check_against(&self.index, &self.tropes);
        if !problems.is_empty() {
            print_warning(&format!(
                "Mapping artifact {} is stale ({} problems); run `npcforge map --force`",
                store.path().display(),
                problems.len()
            ));
        }
        Ok(table)
    }

    fn generator<'a>(&'a self, mapping: &'a MappingTable) -> NpcGenerator<'a> {
        NpcGenerator::new(
            &self.rules,
            &self.index,
            &self.tropes,
            mapping,
            self.config.generation.clone(),
        )
    }
}

async fn build_mapping(
    config: &AppConfig,
    parents: &[ArchetypeParent],
    tropes: &[TropeChild],
) -> std::result::Result<MappingTable, MappingError> {
    let provider = create_provider(&config.embedding)?;
    if !provider.health_check().await {
        log::warn!("Embedding provider '{}' did not pass its health check", provider.name());
    }
    TropeResolver::new(provider, config.mapping.clone())
        .resolve(parents, tropes)
        .await
}

fn load_rules(config: &AppConfig) -> Result<RuleSet> {
    let rules = RuleSet::load(config.data.rules_path().as_deref())
        .into_diagnostic()
        .wrap_err("Could not load the rule tables")?;
    rules
        .validate(config.generation.fallback_biome)
        .into_diagnostic()
        .wrap_err("Rule tables are inconsistent")?;
    Ok(rules)
}

/// An explicit `--config` must load. A broken default config file falls back
/// to the defaults; its error is returned so it can be logged after logging
/// is initialized.
fn load_config(cli: &Cli) -> Result<(AppConfig, Option<ConfigError>)> {
    let (mut config, deferred) = match &cli.config {
        Some(path) => (AppConfig::load_from(path).into_diagnostic()?, None),
        None => match AppConfig::load() {
            Ok(config) => (config, None),
            Err(e) => (AppConfig::default(), Some(e)),
        },
    };
    if let Some(root) = &cli.project_root {
        config.data.project_root = root.clone();
    }
    Ok((config, deferred))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, config_error) = load_config(&cli)?;

    let _log_guard = logging::init(&config.data_dir().join("logs"), cli.verbose);
    log::info!("npcforge v{} starting", npcforge::VERSION);
    if let Some(e) = config_error {
        log::warn!("{e}; using defaults");
    }

    match cli.command {
        Commands::Inspect { map } => inspect(config, map.as_deref()),
        Commands::Map { force } => map_tropes(config, force).await,
        Commands::Generate {
            map,
            x,
            y,
            seed,
            out,
        } => generate(config, &map, x, y, seed, out).await,
        Commands::Showcase => showcase(config).await,
        Commands::Rules => rules(config),
    }
}

fn inspect(config: AppConfig, map: Option<&Path>) -> Result<()> {
    let ws = Workspace::load(config)?;
    print_info(&format!("Loaded parent archetypes: {}", ws.parents.len()));
    print_info(&format!("Loaded child tropes:      {}", ws.tropes.len()));

    let terrain_dir = ws.config.data.terrain_path();
    let map_path = map
        .map(Path::to_path_buf)
        .unwrap_or_else(|| terrain_dir.join(SHOWCASE[0].0));

    if map_path.is_file() {
        let grid = TerrainLoader.load_map(&map_path).into_diagnostic()?;
        let mut summary = format!("cells: {}\n", grid.len());
        for (code, count) in grid.biome_histogram() {
            let name = ws.rules.biome(code).map(|b| b.name.as_str()).unwrap_or("unregistered");
            summary.push_str(&format!("biome {code:>3} ({name}): {count}\n"));
        }
        if let Some(cell) = grid.get_cell(0, 0) {
            summary.push_str(&format!(
                "sample (0,0): biome_code={:?}, elevation={:?}, density={:?}",
                cell.biome_code(),
                cell.geo_data.elevation,
                cell.geo_data.human_density
            ));
        }
        print_panel(grid.name(), &summary);
    } else {
        print_warning(&format!(
            "{} not found; loading folder summary instead",
            map_path.display()
        ));
        let maps = TerrainLoader.load_folder(&terrain_dir).into_diagnostic()?;
        print_info(&format!("Loaded maps: {}", maps.len()));
        if let Some(first) = maps.first() {
            print_info(&format!("First map: {} | cells={}", first.name(), first.len()));
        }
    }

    print_success("Inputs load cleanly");
    Ok(())
}

async fn map_tropes(config: AppConfig, force: bool) -> Result<()> {
    let ws = Workspace::load(config)?;
    let table = ws.mapping(force).await?;
    let summary = table.summary();

    let mut report = format!(
        "rows: {}\nreview needed: {} (threshold {})\n",
        summary.total, summary.review_needed, ws.config.mapping.threshold
    );
    for row in table.rows().iter().filter(|r| r.review_needed).take(10) {
        report.push_str(&format!(
            "  {} -> {} ({:.4})\n",
            row.child_name, row.resolved_parent_id, row.confidence_score
        ));
    }
    print_panel("Archetype mapping", &report);
    print_success(&format!(
        "Mapping ready at {}",
        ws.config.data.mapping_path().display()
    ));
    Ok(())
}

async fn generate(
    config: AppConfig,
    map: &Path,
    x: i64,
    y: i64,
    seed: Option<u64>,
    out: Option<PathBuf>,
) -> Result<()> {
    let ws = Workspace::load(config)?;
    let mapping = ws.mapping(false).await?;
    let grid = TerrainLoader.load_map(map).into_diagnostic()?;

    let seed = seed.unwrap_or(ws.config.generation.default_seed);
    let npc = ws
        .generator(&mapping)
        .generate(&grid, x, y, seed)
        .into_diagnostic()
        .wrap_err_with(|| format!("Could not generate an NPC at ({x}, {y}) in {}", grid.name()))?;

    let out = out.unwrap_or_else(|| ws.config.data.output_path().join(format!("{}.json", npc.npc_id)));
    write_npc(&out, &npc).into_diagnostic()?;

    let json = serde_json::to_string_pretty(&npc).into_diagnostic()?;
    print_panel(&npc.npc_id, &json);
    print_success(&format!("Saved NPC to {}", out.display()));
    Ok(())
}

async fn showcase(config: AppConfig) -> Result<()> {
    let ws = Workspace::load(config)?;
    let mapping = ws.mapping(false).await?;
    let generator = ws.generator(&mapping);
    let terrain_dir = ws.config.data.terrain_path();
    let output_dir = ws.config.data.output_path();

    let mut written = 0;
    for (map_file, biome, output) in SHOWCASE {
        let map_path = terrain_dir.join(map_file);
        if !map_path.is_file() {
            print_warning(&format!("Map not found, skipping: {map_file}"));
            continue;
        }

        let grid = TerrainLoader.load_map(&map_path).into_diagnostic()?;
        let npc = match generator.generate_for_biome(&grid, biome, SHOWCASE_SEED) {
            Ok(npc) => npc,
            Err(e) if e.is_lookup_miss() => {
                print_warning(&format!("No biome {biome} found in {map_file}"));
                continue;
            }
            Err(e) => return Err(e).into_diagnostic(),
        };

        let out = output_dir.join(output);
        write_npc(&out, &npc).into_diagnostic()?;
        print_success(&format!("Saved example NPC to {}", out.display()));
        written += 1;
    }

    if written == 0 {
        return Err(miette!(
            help = "Check data.project_root and data.terrain_dir in the config",
            "No showcase maps were found under {}",
            terrain_dir.display()
        ));
    }
    print_success(&format!("Example NPC generation complete ({written} written)"));
    Ok(())
}

fn rules(config: AppConfig) -> Result<()> {
    let rules = load_rules(&config)?;

    match ArchetypeLoader.load(config.data.archetypes_path()) {
        Ok(parents) => {
            let index = ArchetypeIndex::from_parents(parents);
            for (biome, id) in rules.unknown_archetypes(&index) {
                print_warning(&format!("Biome {biome} pool names unknown archetype {id}"));
            }
        }
        Err(e) => print_warning(&format!("Skipping catalog cross-check: {e}")),
    }

    let yaml = rules.to_yaml().into_diagnostic()?;
    print_panel("Rule tables", &yaml);
    print_success(&format!(
        "{} biomes valid with fallback biome {}",
        rules.biomes().len(),
        config.generation.fallback_biome
    ));
    Ok(())
}
