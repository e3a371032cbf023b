use clap::{Arg, ArgMatches, Command};
use std::error::Error;

use hospital_finance::app_bootstrap::{AppBootstrap, AppConfig};
use hospital_finance::client::{render_dashboard, ApiClient};
use hospital_finance::comm::config::init_global_config_manager;
use hospital_finance::db;

/// 构建命令行应用
fn build_app() -> Command {
    Command::new("hospital-finance")
        .version(env!("CARGO_PKG_VERSION"))
        .about("医院财务管理后端 / Hospital finance administration backend")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("server")
                .about("启动 Web 服务器")
                .arg(
                    Arg::new("host")
                        .long("host")
                        .value_name("HOST")
                        .help("设置服务器主机地址")
                        .default_value("0.0.0.0"),
                )
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .value_name("PORT")
                        .help("设置服务器端口")
                        .default_value("5000"),
                )
                .arg(
                    Arg::new("workers")
                        .short('w')
                        .long("workers")
                        .value_name("WORKERS")
                        .help("设置工作线程数"),
                ),
        )
        .subcommand(Command::new("init-db").about("初始化数据库（建表 + 种子数据，幂等）"))
        .subcommand(
            Command::new("dashboard")
                .about("登录并在终端渲染仪表盘")
                .arg(
                    Arg::new("url")
                        .long("url")
                        .value_name("URL")
                        .help("API 基地址")
                        .default_value("http://127.0.0.1:5000"),
                )
                .arg(
                    Arg::new("username")
                        .short('u')
                        .long("username")
                        .default_value("admin"),
                )
                .arg(
                    Arg::new("password")
                        .long("password")
                        .default_value("admin123"),
                ),
        )
        .subcommand(Command::new("version").about("打印版本信息"))
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let matches: ArgMatches = build_app().get_matches();

    match matches.subcommand() {
        Some(("server", sub_matches)) => {
            handle_server_command(sub_matches).await?;
        }
        Some(("init-db", _)) => {
            handle_init_db_command().await?;
        }
        Some(("dashboard", sub_matches)) => {
            handle_dashboard_command(sub_matches).await?;
        }
        Some(("version", _)) => {
            println!("hospital-finance {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            // subcommand_required(true) 保证不会到这里
            eprintln!("未知命令，请使用 --help 查看可用命令");
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn handle_server_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    // 先初始化全局配置管理器
    init_global_config_manager()?;

    let host = matches
        .get_one::<String>("host")
        .cloned()
        .unwrap_or_else(|| "0.0.0.0".to_string());
    let port: u16 = matches
        .get_one::<String>("port")
        .map(|p| p.parse())
        .transpose()?
        .unwrap_or(5000);
    let workers: Option<usize> = matches
        .get_one::<String>("workers")
        .map(|w| w.parse())
        .transpose()?;

    let config = AppConfig {
        host,
        port,
        workers,
    };

    AppBootstrap::new().with_config(config).run().await?;
    Ok(())
}

async fn handle_init_db_command() -> Result<(), Box<dyn Error>> {
    init_global_config_manager()?;
    hospital_finance::comm::tracing::init_tracing()?;

    let pool = db::get_pool().await?;
    db::initialize_database(&pool).await?;
    println!("数据库初始化完成");
    Ok(())
}

async fn handle_dashboard_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let url = matches
        .get_one::<String>("url")
        .cloned()
        .unwrap_or_else(|| "http://127.0.0.1:5000".to_string());
    let username = matches
        .get_one::<String>("username")
        .cloned()
        .unwrap_or_else(|| "admin".to_string());
    let password = matches
        .get_one::<String>("password")
        .cloned()
        .unwrap_or_else(|| "admin123".to_string());

    let mut client = ApiClient::new(url);
    client.login(&username, &password).await?;

    // 六个聚合端点并发拉取，任一失败则整个视图失败
    let view = client.fetch_dashboard().await?;
    render_dashboard(&view);
    Ok(())
}
