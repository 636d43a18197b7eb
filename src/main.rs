use clap::Parser;
use weeklog::cli::{
    handle_add, handle_delete, handle_get, handle_heatmap, handle_init, handle_list, handle_post,
    handle_serve, handle_update, Cli, Commands,
};

fn main() {
    let cli = Cli::parse();
    let db = cli.db;

    let result = match cli.command {
        Commands::Init => handle_init(&db),
        Commands::Add {
            title,
            description,
            image_url,
            tags,
            json,
        } => handle_add(&db, title, description, image_url, tags, json),
        Commands::List {
            search,
            tag,
            from,
            to,
            sort,
            page,
            all,
            json,
        } => handle_list(&db, search, tag, from, to, sort, page, all, json),
        Commands::Get { id, json } => handle_get(&db, id, json),
        Commands::Update {
            id,
            title,
            description,
            image_url,
            tags,
            json,
        } => handle_update(&db, id, title, description, image_url, tags, json),
        Commands::Delete { id, force } => handle_delete(&db, id, force),
        Commands::Heatmap { json } => handle_heatmap(&db, json),
        Commands::Post {
            platform,
            tone,
            length,
            emoji,
            cta,
            refine,
            show_prompt,
            model,
            json,
        } => handle_post(
            &db,
            platform,
            tone,
            length,
            emoji,
            cta,
            refine,
            show_prompt,
            model,
            json,
        ),
        Commands::Serve { listen, model } => handle_serve(&db, listen, model),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
