mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};

use toolbox_core::{CategoryId, DrawerId, ItemId, RandomIdGenerator};
use toolbox_events::InMemoryEventBus;
use toolbox_infra::snapshot::export_file_name;
use toolbox_infra::{JsonFileSnapshotStore, ToolboxConfig, ToolboxSession};
use toolbox_inventory::{
    InventoryEvent, ItemDraft, QueryCriteria, SlotPosition, all_tags, categories_by_order,
};

type Session = ToolboxSession<
    JsonFileSnapshotStore,
    Arc<InMemoryEventBus<InventoryEvent>>,
    RandomIdGenerator,
>;

#[derive(Parser)]
#[command(name = "toolbox")]
#[command(about = "Personal tool inventory: categories, items and drawer slots", long_about = None)]
struct Cli {
    /// Snapshot file (defaults to TOOLBOX_DATA_PATH, then ./toolbox.json)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List items, filtered and sorted by name
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        favorites: bool,
        /// Exact tag
        #[arg(long)]
        tag: Option<String>,
        /// Case-insensitive search over name, notes, location and tags
        #[arg(long)]
        text: Option<String>,
    },
    /// Every tag in use
    Tags,
    /// Categories in display order
    Categories,
    /// Show a drawer grid (the first drawer by default)
    Drawers {
        #[arg(long)]
        drawer: Option<String>,
    },
    AddCategory { name: String },
    RenameCategory { id: String, name: String },
    /// Delete a category; its items become uncategorized
    DeleteCategory { id: String },
    /// Create an item, or edit the one named by --id
    Upsert {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        quantity: Option<i64>,
        #[arg(long)]
        location: Option<String>,
        /// Comma-separated
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        favorite: Option<bool>,
    },
    DeleteItem { id: String },
    /// Move an item to a category, or out of every category when omitted or blank
    SetCategory { item: String, category: Option<String> },
    /// Put an item into a slot (zero-based), evicting any occupant
    Place { item: String, drawer: String, r: u32, c: u32 },
    Unplace { item: String },
    AddDrawer { name: String, rows: u32, cols: u32 },
    RenameDrawer { id: String, name: String },
    /// Change a drawer's size; items outside the new grid are unplaced
    ResizeDrawer { id: String, rows: u32, cols: u32 },
    /// Remove a drawer; its items are unplaced
    RemoveDrawer { id: String },
    /// Write the whole inventory to a file (toolbox-YYYY-MM-DD.json by default)
    Export { path: Option<PathBuf> },
    /// Replace the whole inventory with a previously exported file
    Import { path: PathBuf },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ToolboxConfig::load().context("invalid environment configuration")?;
    if let Some(data) = cli.data {
        config.data_path = data;
    }
    toolbox_observability::init_with(&config.observability);
    tracing::debug!(data = %config.data_path.display(), "configuration loaded");

    let mut session: Session = ToolboxSession::open(
        JsonFileSnapshotStore::new(&config.data_path),
        Arc::new(InMemoryEventBus::new()),
        RandomIdGenerator,
    )
    .with_context(|| format!("failed to open {}", config.data_path.display()))?;
    let events = session.subscribe();

    run(&mut session, cli.command).await?;

    for event in events.drain() {
        if let Some(line) = render::notice(session.inventory(), &event) {
            println!("{line}");
        }
    }
    Ok(())
}

/// A blank `--category` means uncategorized.
fn category_arg(raw: String) -> Option<CategoryId> {
    (!raw.trim().is_empty()).then(|| CategoryId::new(raw))
}

async fn run(session: &mut Session, command: Command) -> anyhow::Result<()> {
    match command {
        Command::List {
            category,
            favorites,
            tag,
            text,
        } => {
            let criteria = QueryCriteria {
                category_id: category.map(CategoryId::new),
                favorite_only: favorites,
                tag,
                text,
            };
            let items = session.query(&criteria);
            print!("{}", render::items(session.inventory(), &items));
        }
        Command::Tags => {
            for tag in all_tags(session.inventory().items()) {
                println!("{tag}");
            }
        }
        Command::Categories => {
            for category in categories_by_order(session.inventory().categories()) {
                println!("{}\t{}", category.id, category.name);
            }
        }
        Command::Drawers { drawer } => {
            let requested = drawer.map(DrawerId::new);
            let grid = session
                .grid(requested.as_ref())
                .context("there are no drawers")?;
            print!("{}", render::drawer_tabs(session.inventory(), &grid.drawer().id));
            print!("{}", render::grid(&grid));
        }
        Command::AddCategory { name } => {
            let (id, _) = session.add_category(&name).context("failed to add category")?;
            println!("{id}");
        }
        Command::RenameCategory { id, name } => {
            session
                .rename_category(&CategoryId::new(id), &name)
                .context("failed to rename category")?;
        }
        Command::DeleteCategory { id } => {
            session
                .delete_category(&CategoryId::new(id))
                .context("failed to delete category")?;
        }
        Command::Upsert {
            id,
            name,
            category,
            quantity,
            location,
            tags,
            notes,
            favorite,
        } => {
            let existing = id
                .as_deref()
                .map(ItemId::new)
                .and_then(|id| session.inventory().item(&id).cloned());
            let mut draft = match (&existing, name) {
                (Some(item), name) => {
                    let mut draft = ItemDraft::edit(item);
                    if let Some(name) = name {
                        draft.name = name;
                    }
                    draft
                }
                (None, Some(name)) => ItemDraft {
                    id: id.map(ItemId::new),
                    name,
                    ..ItemDraft::default()
                },
                (None, None) => bail!("--name is required when creating an item"),
            };
            if let Some(category) = category {
                draft.category_id = category_arg(category);
            }
            if let Some(quantity) = quantity {
                draft.quantity = Some(quantity);
            }
            if let Some(location) = location {
                draft.location = location;
            }
            if let Some(tags) = tags {
                draft.tags = tags;
            }
            if let Some(notes) = notes {
                draft.notes = notes;
            }
            if let Some(favorite) = favorite {
                draft.favorite = favorite;
            }

            let (id, _) = session.upsert_item(draft).context("failed to save item")?;
            println!("{id}");
        }
        Command::DeleteItem { id } => {
            session.delete_item(&ItemId::new(id)).context("failed to delete item")?;
        }
        Command::SetCategory { item, category } => {
            session
                .set_item_category(&ItemId::new(item), category.and_then(category_arg))
                .context("failed to change category")?;
        }
        Command::Place { item, drawer, r, c } => {
            session
                .request_placement(&ItemId::new(item), &DrawerId::new(drawer), r, c)
                .context("failed to place item")?;
        }
        Command::Unplace { item } => {
            session
                .place_item(&ItemId::new(item), None::<SlotPosition>)
                .context("failed to clear placement")?;
        }
        Command::AddDrawer { name, rows, cols } => {
            let (id, _) = session.add_drawer(&name, rows, cols).context("failed to add drawer")?;
            println!("{id}");
        }
        Command::RenameDrawer { id, name } => {
            session
                .rename_drawer(&DrawerId::new(id), &name)
                .context("failed to rename drawer")?;
        }
        Command::ResizeDrawer { id, rows, cols } => {
            session
                .resize_drawer(&DrawerId::new(id), rows, cols)
                .context("failed to resize drawer")?;
        }
        Command::RemoveDrawer { id } => {
            session
                .remove_drawer(&DrawerId::new(id))
                .context("failed to remove drawer")?;
        }
        Command::Export { path } => {
            let path = path.unwrap_or_else(|| PathBuf::from(export_file_name(Utc::now())));
            session
                .export(&path)
                .await
                .with_context(|| format!("failed to export to {}", path.display()))?;
            println!("{}", path.display());
        }
        Command::Import { path } => {
            session
                .import(&path)
                .await
                .with_context(|| format!("failed to import {}", path.display()))?;
        }
    }
    Ok(())
}
