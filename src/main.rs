use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use recipe_notebook_client::services::SearchForm;
use recipe_notebook_client::utils::logging;
use recipe_notebook_client::{App, Config};
use tracing::info;

#[derive(Parser)]
#[command(name = "recipe-notebook")]
#[command(author, version, about = "レシピ帳クライアント", long_about = None)]
struct Cli {
    /// 后端地址（覆盖 BASE_URL）
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// 显示调试日志
    #[arg(short, long, global = true)]
    verbose: bool,

    /// 先用用户名密码登录（格式 user:password）
    #[arg(long, global = true)]
    login: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 一览 / 检索
    List {
        /// 菜谱名（空格分隔多个）
        #[arg(long)]
        name: Option<String>,
        /// 材料名（空格分隔多个）
        #[arg(long)]
        ingredient: Option<String>,
        /// 只显示收藏
        #[arg(long)]
        favorite: bool,
        #[arg(long, value_name = "YYYY-MM-DD")]
        created_from: Option<String>,
        #[arg(long, value_name = "YYYY-MM-DD")]
        created_to: Option<String>,
        #[arg(long, value_name = "YYYY-MM-DD")]
        updated_from: Option<String>,
        #[arg(long, value_name = "YYYY-MM-DD")]
        updated_to: Option<String>,
    },
    /// 显示详情
    Show { id: i32 },
    /// 从 TOML 草稿新建
    Create {
        draft: PathBuf,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// 用 TOML 草稿更新
    Update {
        id: i32,
        draft: PathBuf,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// 设置收藏（on / off）
    Favorite { id: i32, state: String },
    /// 删除
    Delete { id: i32 },
    /// 批量导入草稿目录
    Import { folder: Option<String> },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    config.verbose_logging |= cli.verbose;

    logging::init(config.verbose_logging);

    let app = App::initialize(config).await?;

    if let Some(credentials) = cli.login.as_deref() {
        let Some((username, password)) = credentials.split_once(':') else {
            bail!("--login 的格式应为 user:password");
        };
        app.login(username, password).await?;
    }

    let output = match cli.command {
        Commands::List {
            name,
            ingredient,
            favorite,
            created_from,
            created_to,
            updated_from,
            updated_to,
        } => {
            let form = SearchForm {
                recipe_names: name.unwrap_or_default(),
                ingredient_names: ingredient.unwrap_or_default(),
                favorite_recipe: favorite,
                create_date_from: created_from.unwrap_or_default(),
                create_date_to: created_to.unwrap_or_default(),
                update_date_from: updated_from.unwrap_or_default(),
                update_date_to: updated_to.unwrap_or_default(),
            };
            app.list(&form).await?
        }
        Commands::Show { id } => app.show(id).await?,
        Commands::Create { draft, image } => app.create(&draft, image.as_deref()).await?,
        Commands::Update { id, draft, image } => {
            app.update(id, &draft, image.as_deref()).await?
        }
        Commands::Favorite { id, state } => {
            let favorite = match state.to_ascii_lowercase().as_str() {
                "on" | "true" | "1" => true,
                "off" | "false" | "0" => false,
                other => bail!("无法识别的收藏状态: {}（应为 on / off）", other),
            };
            app.favorite(id, favorite).await?
        }
        Commands::Delete { id } => app.delete(id).await?,
        Commands::Import { folder } => {
            let stats = app.import(folder.as_deref()).await?;
            format!(
                "成功 {}/{}，校验未通过 {}，失败 {}",
                stats.success, stats.total, stats.rejected, stats.failed
            )
        }
    };

    info!("完成");
    println!("{}", output);

    Ok(())
}
