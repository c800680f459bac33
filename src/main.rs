use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;
use std::env;
use std::path::PathBuf;

use hotel_reservations::{
    parse_room_list, CatalogPaths, CustomerUpdate, HotelUpdate, Reservations, RoomNumber,
};

const USAGE: &str = "\
Usage: hotel-reservations [--data-dir DIR] <command> [args]

Commands:
  list
  show-hotel <name>
  show-customer <name>
  create-hotel <name> <location> <room>...
  remove-hotel <name>
  edit-hotel <name> [--name N] [--location L] [--rooms R,R,...]
  create-customer <name> <email>
  delete-customer <name>
  modify-customer <name> [--name N] [--email E]
  reserve <hotel> <location> <customer> <email> <room>
  cancel <hotel> <room> <customer>";

#[derive(Debug, PartialEq)]
enum Command {
    List,
    ShowHotel(String),
    ShowCustomer(String),
    CreateHotel {
        name: String,
        location: String,
        rooms: Vec<RoomNumber>,
    },
    RemoveHotel(String),
    EditHotel {
        name: String,
        update: HotelUpdate,
    },
    CreateCustomer {
        name: String,
        email: String,
    },
    DeleteCustomer(String),
    ModifyCustomer {
        name: String,
        update: CustomerUpdate,
    },
    Reserve {
        hotel: String,
        location: String,
        customer: String,
        email: String,
        room: RoomNumber,
    },
    Cancel {
        hotel: String,
        room: RoomNumber,
        customer: String,
    },
}

impl Command {
    fn mutates(&self) -> bool {
        !matches!(
            self,
            Command::List | Command::ShowHotel(_) | Command::ShowCustomer(_)
        )
    }
}

fn main() {
    init_logging();

    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(err) = run(&args) {
        eprintln!("❌ {:#}", err);
        std::process::exit(1);
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &[String]) -> Result<()> {
    let (data_dir, rest) = split_data_dir(args)?;
    let paths = match data_dir {
        Some(dir) => CatalogPaths::in_dir(dir),
        None => CatalogPaths::from_env(),
    };

    let command = parse_command(rest)?;

    let (mut catalog, report) = Reservations::load(&paths).context("Failed to load catalog")?;
    if !report.is_clean() {
        println!("⚠️  {}", report.summary());
    }

    execute(&mut catalog, &command)?;

    if command.mutates() {
        catalog.save(&paths).context("Failed to save catalog")?;
    }
    Ok(())
}

fn execute(catalog: &mut Reservations, command: &Command) -> Result<()> {
    match command {
        Command::List => {
            println!("🏨 Hotels ({})", catalog.hotels().len());
            for hotel in catalog.hotels().iter() {
                println!(
                    "  {} ({}) - {} available, {} reserved",
                    hotel.name(),
                    hotel.location(),
                    hotel.available_rooms().len(),
                    hotel.reservations().len()
                );
            }
            println!("👤 Customers ({})", catalog.customers().len());
            for customer in catalog.customers().iter() {
                println!("  {} <{}>", customer.name(), customer.email());
            }
        }
        Command::ShowHotel(name) => match catalog.hotel(name) {
            Some(hotel) => println!("{}", hotel),
            None => println!("Hotel not found"),
        },
        Command::ShowCustomer(name) => match catalog.customer(name) {
            Some(customer) => println!("{}", customer),
            None => println!("Customer does not exist!"),
        },
        Command::CreateHotel { name, location, rooms } => {
            if catalog.create_hotel(name, location, rooms.clone())? {
                println!("✓ Hotel {} created", name);
            } else {
                println!("Hotel {} already exists", name);
            }
        }
        Command::RemoveHotel(name) => {
            if catalog.remove_hotel(name) {
                println!("✓ Hotel {} removed", name);
            } else {
                println!("Hotel does not exist!");
            }
        }
        Command::EditHotel { name, update } => {
            if catalog.edit_hotel(name, update.clone())? {
                println!("✓ Hotel information modified successfully");
            } else {
                println!("Hotel Not Found!");
            }
        }
        Command::CreateCustomer { name, email } => {
            if catalog.create_customer(name, email) {
                println!("✓ Customer {} created", name);
            } else if name.is_empty() || email.is_empty() {
                println!("Customer needs a name and an email");
            } else {
                println!("Customer already exists!");
            }
        }
        Command::DeleteCustomer(name) => {
            if catalog.delete_customer(name) {
                println!("✓ Customer {} deleted", name);
            } else {
                println!("Customer does not exist!");
            }
        }
        Command::ModifyCustomer { name, update } => {
            if catalog.modify_customer(name, update.clone())? {
                println!("✓ Customer information modified successfully");
            } else {
                println!("Customer does not exist!");
            }
        }
        Command::Reserve { hotel, location, customer, email, room } => {
            if catalog.reserve_room(hotel, location, customer, email, *room) {
                println!("✓ Room {} reserved for {}", room, customer);
            } else {
                println!("Room {} is not available", room);
            }
        }
        Command::Cancel { hotel, room, customer } => {
            if catalog.cancel_reservation(hotel, *room, customer) {
                println!("✓ Reservation for {} in room {} cancelled", customer, room);
            } else {
                println!("No such reservation found");
            }
        }
    }
    Ok(())
}

// ============================================================================
// ARGUMENT PARSING
// ============================================================================

fn split_data_dir(args: &[String]) -> Result<(Option<PathBuf>, &[String])> {
    match args {
        [flag, dir, rest @ ..] if flag == "--data-dir" => Ok((Some(PathBuf::from(dir)), rest)),
        [flag] if flag == "--data-dir" => bail!("--data-dir needs a directory"),
        _ => Ok((None, args)),
    }
}

fn parse_command(args: &[String]) -> Result<Command> {
    let (name, rest) = args.split_first().ok_or_else(|| anyhow!("{}", USAGE))?;
    let rest: Vec<&str> = rest.iter().map(String::as_str).collect();

    let command = match (name.as_str(), rest.as_slice()) {
        ("list", []) => Command::List,
        ("show-hotel", [hotel]) => Command::ShowHotel(hotel.to_string()),
        ("show-customer", [customer]) => Command::ShowCustomer(customer.to_string()),
        ("create-hotel", [hotel, location, rooms @ ..]) if !rooms.is_empty() => Command::CreateHotel {
            name: hotel.to_string(),
            location: location.to_string(),
            rooms: parse_rooms(rooms)?,
        },
        ("remove-hotel", [hotel]) => Command::RemoveHotel(hotel.to_string()),
        ("edit-hotel", [hotel, options @ ..]) => Command::EditHotel {
            name: hotel.to_string(),
            update: parse_hotel_update(options)?,
        },
        ("create-customer", [customer, email]) => Command::CreateCustomer {
            name: customer.to_string(),
            email: email.to_string(),
        },
        ("delete-customer", [customer]) => Command::DeleteCustomer(customer.to_string()),
        ("modify-customer", [customer, options @ ..]) => Command::ModifyCustomer {
            name: customer.to_string(),
            update: parse_customer_update(options)?,
        },
        ("reserve", [hotel, location, customer, email, room]) => Command::Reserve {
            hotel: hotel.to_string(),
            location: location.to_string(),
            customer: customer.to_string(),
            email: email.to_string(),
            room: parse_room(room)?,
        },
        ("cancel", [hotel, room, customer]) => Command::Cancel {
            hotel: hotel.to_string(),
            room: parse_room(room)?,
            customer: customer.to_string(),
        },
        _ => bail!("{}", USAGE),
    };
    Ok(command)
}

fn parse_room(arg: &str) -> Result<RoomNumber> {
    let room: RoomNumber = arg
        .trim()
        .parse()
        .with_context(|| format!("Invalid room number: {}", arg))?;
    if room == 0 {
        bail!("Room 0 cannot be reserved");
    }
    Ok(room)
}

/// Room arguments go through the same check as room lists read from disk.
fn parse_rooms(args: &[&str]) -> Result<Vec<RoomNumber>> {
    let values = args
        .iter()
        .map(|arg| {
            arg.trim()
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::from(arg.trim()))
        })
        .collect::<Vec<_>>();
    Ok(parse_room_list(&Value::Array(values))?)
}

fn parse_hotel_update(options: &[&str]) -> Result<HotelUpdate> {
    let mut update = HotelUpdate::default();
    for pair in options.chunks(2) {
        match pair {
            ["--name", value] => update.name = Some(value.to_string()),
            ["--location", value] => update.location = Some(value.to_string()),
            ["--rooms", value] => {
                let rooms: Vec<&str> = value.split(',').filter(|s| !s.trim().is_empty()).collect();
                update.rooms = Some(parse_rooms(&rooms)?);
            }
            _ => bail!("Unknown edit-hotel option: {}", pair.join(" ")),
        }
    }
    Ok(update)
}

fn parse_customer_update(options: &[&str]) -> Result<CustomerUpdate> {
    let mut update = CustomerUpdate::default();
    for pair in options.chunks(2) {
        match pair {
            ["--name", value] => update.name = Some(value.to_string()),
            ["--email", value] => update.email = Some(value.to_string()),
            _ => bail!("Unknown modify-customer option: {}", pair.join(" ")),
        }
    }
    Ok(update)
}
