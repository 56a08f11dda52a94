use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use feishu_bot::message::card::HeaderTemplate;
use feishu_bot::message::card::element::Markdown;
use feishu_bot::message::text;
use feishu_bot::{
    ApiResponse, Bot, CardBuilder, CardGlobalConfig, CardMessage, Config, Language,
    RichTextBuilder, RichTextMessage,
};

/// Feishu Bot - send messages through a Feishu/Lark custom-bot webhook
#[derive(Parser)]
#[command(name = "feishu-bot", version, about)]
struct Cli {
    /// Webhook URL or bare hook token
    #[arg(short, long, env = "FS_BOT_WEBHOOK", hide_env_values = true)]
    webhook: Option<String>,

    /// Signing secret, if the bot has signature verification enabled
    #[arg(short, long, env = "FS_BOT_SECRET_KEY", hide_env_values = true)]
    secret: Option<String>,

    /// Config file to read instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send a plain text message
    Text {
        /// Message text
        text: String,
        /// Mention a user by ID (repeatable)
        #[arg(long)]
        at: Vec<String>,
        /// Mention everyone in the chat
        #[arg(long)]
        at_all: bool,
    },
    /// Send an uploaded image
    Image {
        /// Image key returned by the upload API
        image_key: String,
    },
    /// Share a group chat card
    ShareChat {
        /// Chat ID to share
        chat_id: String,
    },
    /// Send a rich text post
    Post {
        /// Post title
        #[arg(short, long, default_value = "")]
        title: String,
        /// Language tag of the post
        #[arg(short, long, default_value = "zh_cn")]
        lang: String,
        /// Append a hyperlink to the post
        #[arg(long)]
        link: Option<String>,
        /// Post text
        text: String,
    },
    /// Send an interactive card with a markdown body
    Card {
        /// Header title
        #[arg(short, long)]
        title: String,
        /// Header subtitle
        #[arg(long)]
        subtitle: Option<String>,
        /// Language tag of the card
        #[arg(short, long, default_value = "zh_cn")]
        lang: String,
        /// Header color
        #[arg(long, value_enum, default_value_t = Theme::Blue)]
        theme: Theme,
        /// Markdown body
        markdown: String,
    },
    /// Send a card built from a saved template
    Template {
        /// Template ID from the card builder
        template_id: String,
        /// Template variables as a JSON object
        #[arg(long, default_value = "{}")]
        vars: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Theme {
    Blue,
    Wathet,
    Turquoise,
    Green,
    Yellow,
    Orange,
    Red,
    Carmine,
    Violet,
    Purple,
    Indigo,
    Grey,
    Default,
}

impl From<Theme> for HeaderTemplate {
    fn from(theme: Theme) -> Self {
        match theme {
            Theme::Blue => Self::Blue,
            Theme::Wathet => Self::Wathet,
            Theme::Turquoise => Self::Turquoise,
            Theme::Green => Self::Green,
            Theme::Yellow => Self::Yellow,
            Theme::Orange => Self::Orange,
            Theme::Red => Self::Red,
            Theme::Carmine => Self::Carmine,
            Theme::Violet => Self::Violet,
            Theme::Purple => Self::Purple,
            Theme::Indigo => Self::Indigo,
            Theme::Grey => Self::Grey,
            Theme::Default => Self::Default,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,feishu_bot=info",
        1 => "info,feishu_bot=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("reading config file {}", path.display()))?,
        None => Config::load(),
    };
    tracing::debug!(?config, "loaded configuration");

    let webhook = cli
        .webhook
        .or(config.webhook)
        .context("no webhook configured (pass --webhook or set FS_BOT_WEBHOOK)")?;

    let mut options = config.options;
    if let Some(secret) = cli.secret {
        options = options.secret(secret);
    }

    let bot = Bot::new(&webhook, options)?;

    let response = match cli.command {
        Command::Text { text, at, at_all } => bot.send_text(mentions(&text, &at, at_all)).await?,
        Command::Image { image_key } => bot.send_image(image_key).await?,
        Command::ShareChat { chat_id } => bot.send_share_chat(chat_id).await?,
        Command::Post {
            title,
            lang,
            link,
            text,
        } => {
            let mut post = RichTextBuilder::new(Language::new(lang), title).text(text, false);
            if let Some(href) = link {
                post = post.hyperlink(href.clone(), href);
            }
            bot.send_rich_text(&RichTextMessage::new(post)).await?
        }
        Command::Card {
            title,
            subtitle,
            lang,
            theme,
            markdown,
        } => {
            let mut card =
                CardBuilder::new(Language::new(lang), title).element(Markdown::new(markdown));
            if let Some(subtitle) = subtitle {
                card = card.header_subtitle(subtitle);
            }
            let message = CardMessage::new(card)
                .global_config(CardGlobalConfig::new().header_template(theme.into()));
            bot.send_card(&message).await?
        }
        Command::Template { template_id, vars } => {
            let vars: serde_json::Value =
                serde_json::from_str(&vars).context("--vars is not valid JSON")?;
            bot.send_card_template(template_id, vars).await?
        }
    };

    report(&response);
    Ok(())
}

/// Append mention tags to a text message
fn mentions(text: &str, users: &[String], everyone: bool) -> String {
    let mut out = text.to_string();
    for id in users {
        out.push(' ');
        out.push_str(&text::at_person(id, ""));
    }
    if everyone {
        out.push(' ');
        out.push_str(text::at_everyone());
    }
    out
}

fn report(response: &ApiResponse) {
    if response.msg.is_empty() {
        println!("sent");
    } else {
        println!("sent: {}", response.msg);
    }
}
