use crate::{
    account::{Outcome, ProfileCard, ProfileFlow, ProfileLoad},
    api::{ApiClient, ProfilePicture, check_picture, upload::guess_content_type},
    cli::{actions::report, globals::GlobalArgs},
    session::{FileStorage, SessionContext},
};
use anyhow::{Context, Result, bail};
use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::debug;

#[derive(Debug)]
pub enum ProfileCommand {
    Show,
    Upload(PathBuf),
    DeletePicture,
    Logout,
    ResetPassword,
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub command: ProfileCommand,
}

const NOT_SIGNED_IN: &str = "Not signed in, run `authportal login` first";

/// # Errors
/// Returns an error if the command fails or no user is signed in.
pub async fn execute(args: Args) -> Result<()> {
    let (client, session) = args.globals.connect()?;
    let mut flow = ProfileFlow::new();

    match args.command {
        ProfileCommand::Show => {
            show(&mut flow, &client, &session).await?;
            args.globals.persist_cookies(&client, &session)?;
        }
        ProfileCommand::Logout => report(&flow.logout(&client, &session).await?)?,
        command => {
            if !session.is_signed_in()? {
                bail!(NOT_SIGNED_IN);
            }
            let outcome = match command {
                ProfileCommand::Upload(path) => match load_picture(&path).await? {
                    Ok(picture) => flow.upload_picture(&client, &session, &picture).await?,
                    Err(rejection) => rejection,
                },
                ProfileCommand::DeletePicture => flow.delete_picture(&client, &session).await?,
                ProfileCommand::ResetPassword => flow.request_password_reset(&client).await,
                ProfileCommand::Show | ProfileCommand::Logout => Outcome::default(),
            };
            args.globals.persist_cookies(&client, &session)?;
            report(&outcome)?;
        }
    }
    Ok(())
}

async fn show(
    flow: &mut ProfileFlow,
    client: &ApiClient,
    session: &SessionContext<FileStorage>,
) -> Result<()> {
    match flow.open(client, session).await? {
        ProfileLoad::Ready(card) => {
            print_card(&card, &mut io::stdout().lock())?;
            Ok(())
        }
        ProfileLoad::Redirect(outcome) => {
            report(&outcome)?;
            bail!(NOT_SIGNED_IN)
        }
    }
}

/// Reads a picture from disk. A file that fails the type or size check is
/// returned as an error outcome and is never read in full.
async fn load_picture(path: &Path) -> Result<Result<ProfilePicture, Outcome>> {
    let metadata = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let content_type = guess_content_type(path);
    debug!(%content_type, size = metadata.len(), "checking picture");
    if let Err(rejection) = check_picture(&content_type, metadata.len()) {
        return Ok(Err(Outcome::error(rejection.to_string())));
    }

    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(ProfilePicture::from_file(path, bytes)
        .map_err(|rejection| Outcome::error(rejection.to_string())))
}

fn print_card(card: &ProfileCard, out: &mut impl Write) -> io::Result<()> {
    let user = &card.user;
    writeln!(out, "Username: {}", user.username)?;
    writeln!(out, "Name:     {}", user.full_name())?;
    writeln!(out, "Email:    {}", user.email)?;
    writeln!(out, "Phone:    {}", user.phone)?;
    writeln!(out, "Verified: {}", if user.verified { "yes" } else { "no" })?;
    writeln!(out, "Picture:  {}", card.picture_url)
}
