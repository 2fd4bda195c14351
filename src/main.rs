use academ_scraper::{logger, sanitize_username, App, Config, Credentials, ProgressStore};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "academ_scraper")]
#[command(about = "抓取 PITCH 学业进度并保存为 JSON", long_about = None)]
struct Cli {
    /// CAS 登录名
    #[arg(long, env = "ACADEM_USERNAME")]
    username: String,
    /// CAS 密码
    #[arg(long, env = "ACADEM_PASSWORD", hide_env_values = true)]
    password: String,
    /// 输出文件名使用的用户标识，默认由登录名生成
    #[arg(long)]
    clean_username: Option<String>,
    /// TOML 配置文件
    #[arg(long)]
    config: Option<PathBuf>,
    /// 输出目录
    #[arg(long)]
    output_dir: Option<String>,
    /// 最大并发请求数
    #[arg(long)]
    max_concurrent: Option<usize>,
    /// 详细日志
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = Config::load(cli.config.as_deref()).context("加载配置失败")?;
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }
    if let Some(n) = cli.max_concurrent {
        config.max_concurrent_requests = n;
    }
    config.verbose_logging |= cli.verbose;
    config.validate().context("配置不合法")?;

    // 初始化日志
    logger::init(config.verbose_logging);

    let clean_username = cli
        .clean_username
        .map(|name| sanitize_username(&name))
        .unwrap_or_else(|| sanitize_username(&cli.username));
    let credentials = Credentials::new(cli.username, cli.password);

    // 初始化并运行应用
    let app = App::initialize(config, &credentials, &clean_username, ProgressStore::new())
        .await
        .context("初始化失败")?;
    app.run().await.context("抓取失败")?;

    Ok(())
}
