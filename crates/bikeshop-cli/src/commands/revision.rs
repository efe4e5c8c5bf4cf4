//! `bikeshop revision ...`

use bikeshop_core::errors::Result;
use bikeshop_core::{EntityId, Repository, Revision, RevisionController, RevisionForm};
use clap::{Args, Subcommand};

use super::{print_deleted, print_json, GlobalArgs};

#[derive(Debug, Args)]
pub struct RevisionArgs {
    #[command(subcommand)]
    pub command: RevisionCommand,
}

#[derive(Debug, Subcommand)]
pub enum RevisionCommand {
    /// List all revisions, optionally only those of one bike
    List {
        #[arg(long)]
        bike: Option<EntityId>,
    },

    /// Show one revision with its bike and owner
    Show { id: EntityId },

    /// Record a revision for an existing bike
    Add {
        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: String,

        #[arg(long)]
        description: String,

        #[arg(long)]
        price: String,

        /// Bike id
        #[arg(long)]
        bike: EntityId,
    },

    /// Change fields of an existing revision
    Update {
        id: EntityId,

        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        price: Option<String>,

        #[arg(long)]
        bike: Option<EntityId>,
    },

    /// Delete a revision
    Delete { id: EntityId },
}

pub fn execute(global: &GlobalArgs, args: RevisionArgs) -> Result<()> {
    let mut store = global.open_store()?;
    let mut controller = RevisionController::new();

    match args.command {
        RevisionCommand::List { bike } => {
            let revisions: Vec<&Revision> = controller
                .load(&store)?
                .iter()
                .filter(|r| bike.map_or(true, |id| r.bike_id() == Some(id)))
                .collect();
            if global.json {
                return print_json(&revisions);
            }
            if revisions.is_empty() {
                println!("No revisions");
            }
            for revision in revisions {
                println!("{}", line(revision));
            }
            Ok(())
        }
        RevisionCommand::Show { id } => {
            let revision = Repository::<Revision>::get(&store, id)?;
            print_revision(global, &revision)
        }
        RevisionCommand::Add {
            date,
            description,
            price,
            bike,
        } => {
            let form = RevisionForm::new()
                .date(date)
                .description(description)
                .price(price)
                .bike_id(bike);
            let revision = controller.insert(&mut store, &form)?;
            if !global.json {
                print!("Created ");
            }
            print_revision(global, &revision)
        }
        RevisionCommand::Update {
            id,
            date,
            description,
            price,
            bike,
        } => {
            let form = RevisionForm {
                date,
                description,
                price,
                bike_id: bike,
            };
            let revision = controller.update(&mut store, id, &form)?;
            if !global.json {
                print!("Updated ");
            }
            print_revision(global, &revision)
        }
        RevisionCommand::Delete { id } => {
            controller.delete(&mut store, id)?;
            print_deleted(global, Revision::ENTITY, id)
        }
    }
}

fn print_revision(global: &GlobalArgs, revision: &Revision) -> Result<()> {
    if global.json {
        print_json(revision)
    } else {
        println!("revision {}", line(revision));
        Ok(())
    }
}

fn line(revision: &Revision) -> String {
    format!(
        "{}\t{}\t{}\t{:.2}\tbike {} ({})",
        revision.id.unwrap_or_default(),
        revision.date.format("%Y-%m-%d"),
        revision.description,
        revision.price,
        revision.bike_id().unwrap_or_default(),
        revision.display_name()
    )
}
