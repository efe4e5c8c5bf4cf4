//! `bikeshop owner ...`

use bikeshop_core::errors::Result;
use bikeshop_core::{EntityId, Owner, OwnerController, OwnerForm, Repository};
use clap::{Args, Subcommand};

use super::{print_deleted, print_json, GlobalArgs};

#[derive(Debug, Args)]
pub struct OwnerArgs {
    #[command(subcommand)]
    pub command: OwnerCommand,
}

#[derive(Debug, Subcommand)]
pub enum OwnerCommand {
    /// List all owners
    List,

    /// Show one owner
    Show { id: EntityId },

    /// Register a new owner
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        surname: String,

        /// Nine digits
        #[arg(long)]
        phone: String,

        #[arg(long)]
        email: String,
    },

    /// Change fields of an existing owner; omitted flags keep their value
    Update {
        id: EntityId,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        surname: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },

    /// Delete an owner that has no bikes
    Delete { id: EntityId },
}

pub fn execute(global: &GlobalArgs, args: OwnerArgs) -> Result<()> {
    let mut store = global.open_store()?;
    let mut controller = OwnerController::new();

    match args.command {
        OwnerCommand::List => {
            let owners = controller.load(&store)?;
            if global.json {
                return print_json(owners);
            }
            if owners.is_empty() {
                println!("No owners");
            }
            for owner in owners {
                println!("{}", line(owner));
            }
            Ok(())
        }
        OwnerCommand::Show { id } => {
            let owner = Repository::<Owner>::get(&store, id)?;
            print_owner(global, &owner)
        }
        OwnerCommand::Add {
            name,
            surname,
            phone,
            email,
        } => {
            let form = OwnerForm::new()
                .name(name)
                .surname(surname)
                .phone(phone)
                .email(email);
            let owner = controller.insert(&mut store, &form)?;
            if !global.json {
                print!("Created ");
            }
            print_owner(global, &owner)
        }
        OwnerCommand::Update {
            id,
            name,
            surname,
            phone,
            email,
        } => {
            let form = OwnerForm {
                name,
                surname,
                phone,
                email,
            };
            let owner = controller.update(&mut store, id, &form)?;
            if !global.json {
                print!("Updated ");
            }
            print_owner(global, &owner)
        }
        OwnerCommand::Delete { id } => {
            controller.delete(&mut store, id)?;
            print_deleted(global, Owner::ENTITY, id)
        }
    }
}

fn print_owner(global: &GlobalArgs, owner: &Owner) -> Result<()> {
    if global.json {
        print_json(owner)
    } else {
        println!("owner {}", line(owner));
        Ok(())
    }
}

fn line(owner: &Owner) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        owner.id.unwrap_or_default(),
        owner.display_name(),
        owner.phone,
        owner.email
    )
}
