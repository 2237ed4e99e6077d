//! `contacts` command-line client: local-first contact management with
//! best-effort synchronisation against the remote contacts API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Context, Report, Result, eyre};
use futures_util::StreamExt;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use contacts::config::ContactsSettings;
use contacts::domain::ports::{
    FixtureRemoteContactGateway, LocalContactStore, RemoteContactGateway,
};
use contacts::domain::{
    Contact, CreateContactUseCase, DeleteContactsUseCase, Error, GetContactsUseCase,
    SearchContactsUseCase, SyncContactsUseCase, SyncingContactRepository, UpdateContactUseCase,
};
use contacts::outbound::contacts_api::ContactsHttpGateway;
use contacts::outbound::persistence::WatchedContactStore;

const PHONE_FORMATTING: [char; 6] = [' ', '-', '(', ')', '+', '.'];

/// `contacts` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "contacts",
    about = "Manage contacts locally and keep them in sync with the contacts API",
    version
)]
struct Cli {
    /// Work against the local store only, never contacting the API.
    #[arg(long)]
    offline: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every contact, ordered by name.
    List {
        /// Keep printing the list whenever it changes, until interrupted.
        #[arg(long)]
        watch: bool,
    },
    /// Print contacts whose name, last name, or phone contain the query.
    Search {
        /// Text to look for.
        query: String,
    },
    /// Create a contact.
    Add(ContactFields),
    /// Replace an existing contact.
    Update {
        /// Identifier of the contact to replace.
        #[arg(long)]
        id: i64,
        #[command(flatten)]
        fields: ContactFields,
    },
    /// Delete contacts by identifier.
    Delete {
        /// Identifiers to delete.
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// Refresh the local store from the API.
    Sync,
}

#[derive(Debug, Clone, Args)]
struct ContactFields {
    /// Given name.
    #[arg(long, default_value = "")]
    name: String,
    /// Family name.
    #[arg(long = "last-name", default_value = "")]
    last_name: String,
    /// Phone number; spaces, dashes, dots, brackets, and `+` are ignored.
    #[arg(long, default_value = "")]
    phone: String,
    /// Avatar URL.
    #[arg(long = "image-url", default_value = "")]
    image_url: String,
}

impl ContactFields {
    fn into_contact(self) -> Result<Contact, Error> {
        let phone = normalise_phone(&self.phone)?;
        Ok(Contact::new(self.name, self.last_name, phone, self.image_url))
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let settings = ContactsSettings::load_from_iter([OsString::from("contacts")])
        .map_err(|err| eyre!("failed to load contacts settings: {err}"))?;

    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build contacts runtime")?;
    runtime.block_on(run(cli, settings))
}

async fn run(cli: Cli, settings: ContactsSettings) -> Result<()> {
    let store_path = settings.store_path();
    let store = Arc::new(
        WatchedContactStore::open(&store_path)
            .await
            .map_err(|err| Report::new(err).wrap_err(format!("open {}", store_path.display())))?,
    );

    if cli.offline || settings.offline {
        info!("running offline");
        return execute(cli.command, store, Arc::new(FixtureRemoteContactGateway)).await;
    }

    let base = settings
        .api_base_url()
        .wrap_err("invalid contacts API base URL")?;
    let gateway = ContactsHttpGateway::new(base, settings.request_timeout())
        .wrap_err("failed to build contacts API client")?;
    execute(cli.command, store, Arc::new(gateway)).await
}

async fn execute<G>(command: Command, store: Arc<WatchedContactStore>, gateway: Arc<G>) -> Result<()>
where
    G: RemoteContactGateway + 'static,
{
    let repository = Arc::new(SyncingContactRepository::new(Arc::clone(&store), gateway));

    match command {
        Command::List { watch: false } => {
            // A one-shot listing exits straight away, so it cannot leave the
            // refresh running in the background.
            let outcome = repository.refresh().await;
            debug!(?outcome, "refreshed before listing");
            print_contacts(&store.observe_all().next().await.unwrap_or_default());
        }
        Command::List { watch: true } => {
            let mut contacts = GetContactsUseCase::new(repository).execute();
            loop {
                tokio::select! {
                    next = contacts.next() => match next {
                        Some(rows) => print_contacts(&rows),
                        None => return Ok(()),
                    },
                    _ = tokio::signal::ctrl_c() => return Ok(()),
                }
            }
        }
        Command::Search { query } => {
            let found = SearchContactsUseCase::new(repository)
                .execute(&query)
                .next()
                .await
                .unwrap_or_default();
            print_contacts(&found);
        }
        Command::Add(fields) => {
            let contact = fields.into_contact().map_err(report)?;
            CreateContactUseCase::new(repository)
                .execute(contact)
                .await
                .map_err(report)?;
        }
        Command::Update { id, fields } => {
            let contact = fields.into_contact().map_err(report)?.with_id(id);
            UpdateContactUseCase::new(repository)
                .execute(contact)
                .await
                .map_err(report)?;
        }
        Command::Delete { ids } => {
            let rows = store.observe_all().next().await.unwrap_or_default();
            let selection = select_by_id(&rows, &ids);
            DeleteContactsUseCase::new(repository)
                .execute(&selection)
                .await
                .map_err(report)?;
        }
        Command::Sync => {
            SyncContactsUseCase::new(repository)
                .execute()
                .await
                .map_err(report)?;
        }
    }
    Ok(())
}

fn normalise_phone(raw: &str) -> Result<String, Error> {
    let kept = raw
        .chars()
        .filter(|c| !PHONE_FORMATTING.contains(c))
        .collect::<String>();
    if kept.chars().all(|c| c.is_ascii_digit()) {
        Ok(kept)
    } else {
        Err(Error::fix_fields(format!("phone '{raw}' must contain digits only")))
    }
}

fn select_by_id(rows: &[Contact], ids: &[i64]) -> Vec<Contact> {
    for id in ids {
        if !rows.iter().any(|row| row.id == *id) {
            warn!(id, "no contact with this id");
        }
    }
    rows.iter()
        .filter(|row| ids.contains(&row.id))
        .cloned()
        .collect()
}

fn print_contacts(rows: &[Contact]) {
    if rows.is_empty() {
        println!("(no contacts)");
    }
    for row in rows {
        println!("{}\t{}\t{}", row.id, row.display_name(), row.phone);
    }
}

fn report(error: Error) -> Report {
    eyre!("{}: {}", error.code(), error.message())
}
