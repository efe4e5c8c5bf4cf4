//! `bikeshop bike ...`

use bikeshop_core::errors::Result;
use bikeshop_core::{Bike, BikeController, BikeForm, EntityId, Repository};
use clap::{Args, Subcommand};

use super::{print_deleted, print_json, GlobalArgs};

#[derive(Debug, Args)]
pub struct BikeArgs {
    #[command(subcommand)]
    pub command: BikeCommand,
}

#[derive(Debug, Subcommand)]
pub enum BikeCommand {
    /// List all bikes, optionally only those of one owner
    List {
        #[arg(long)]
        owner: Option<EntityId>,
    },

    /// Show one bike with its owner
    Show { id: EntityId },

    /// Register a new bike for an existing owner
    Add {
        #[arg(long)]
        brand: String,

        #[arg(long)]
        model: String,

        /// Manufacture year, 1990 up to the current year
        #[arg(long)]
        year: String,

        /// Weight in kilograms
        #[arg(long)]
        weight: String,

        /// MTB, ROAD, GRAVEL or EBIKE
        #[arg(long = "type")]
        bike_type: String,

        /// YES or NO
        #[arg(long)]
        carbon: String,

        /// Owner id
        #[arg(long)]
        owner: EntityId,
    },

    /// Change fields of an existing bike; `--owner` re-points it
    Update {
        id: EntityId,

        #[arg(long)]
        brand: Option<String>,

        #[arg(long)]
        model: Option<String>,

        #[arg(long)]
        year: Option<String>,

        #[arg(long)]
        weight: Option<String>,

        #[arg(long = "type")]
        bike_type: Option<String>,

        #[arg(long)]
        carbon: Option<String>,

        #[arg(long)]
        owner: Option<EntityId>,
    },

    /// Delete a bike (its revisions block the delete unless the policy cascades)
    Delete { id: EntityId },
}

pub fn execute(global: &GlobalArgs, args: BikeArgs) -> Result<()> {
    let mut store = global.open_store()?;
    let mut controller = BikeController::new();

    match args.command {
        BikeCommand::List { owner } => {
            controller.load(&store)?;
            let bikes: Vec<&Bike> = match owner {
                Some(owner_id) => controller.by_owner(owner_id).collect(),
                None => controller.items().iter().collect(),
            };
            if global.json {
                return print_json(&bikes);
            }
            if bikes.is_empty() {
                println!("No bikes");
            }
            for bike in bikes {
                println!("{}", line(bike));
            }
            Ok(())
        }
        BikeCommand::Show { id } => {
            let bike = Repository::<Bike>::get(&store, id)?;
            print_bike(global, &bike)
        }
        BikeCommand::Add {
            brand,
            model,
            year,
            weight,
            bike_type,
            carbon,
            owner,
        } => {
            let form = BikeForm::new()
                .brand(brand)
                .model(model)
                .year(year)
                .weight(weight)
                .bike_type(bike_type)
                .carbon(carbon)
                .owner_id(owner);
            let bike = controller.insert(&mut store, &form)?;
            if !global.json {
                print!("Created ");
            }
            print_bike(global, &bike)
        }
        BikeCommand::Update {
            id,
            brand,
            model,
            year,
            weight,
            bike_type,
            carbon,
            owner,
        } => {
            let form = BikeForm {
                brand,
                model,
                year,
                weight,
                bike_type,
                carbon,
                owner_id: owner,
            };
            let bike = controller.update(&mut store, id, &form)?;
            if !global.json {
                print!("Updated ");
            }
            print_bike(global, &bike)
        }
        BikeCommand::Delete { id } => {
            controller.delete(&mut store, id)?;
            print_deleted(global, Bike::ENTITY, id)
        }
    }
}

fn print_bike(global: &GlobalArgs, bike: &Bike) -> Result<()> {
    if global.json {
        print_json(bike)
    } else {
        println!("bike {}", line(bike));
        Ok(())
    }
}

fn line(bike: &Bike) -> String {
    format!(
        "{}\t{}\t{}\t{} kg\t{}\t{}\towner {} ({})",
        bike.id.unwrap_or_default(),
        bike.display_name(),
        bike.year,
        bike.weight,
        bike.bike_type,
        bike.carbon,
        bike.owner_id().unwrap_or_default(),
        bike.owner.display_name()
    )
}
