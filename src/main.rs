use bespoke_bouquet::adapters::{
    EmailRelay, MessagingHandoff, PostcodesIoClient, SanityClient,
};
use bespoke_bouquet::config::{
    parse_add_on, CartCommand, ChannelKind, CheckoutArgs, Command, PointerArg, SimulateArgs,
};
use bespoke_bouquet::core::delivery::{normalize_postcode, DeliveryQuote};
use bespoke_bouquet::core::{CartStore, Checkout, CheckoutForm, Customization, DeliveryQuoter, Storefront};
use bespoke_bouquet::domain::ports::OrderChannel;
use bespoke_bouquet::field::{ParticleField, PointerPath, RunSummary, Simulation};
use bespoke_bouquet::utils::error::{ErrorSeverity, Result, ShopError};
use bespoke_bouquet::utils::monitor::SystemMonitor;
use bespoke_bouquet::utils::logger;
use bespoke_bouquet::utils::validation::{validate_required_field, Validate};
use bespoke_bouquet::{CliConfig, LocalStorage, ShopConfig};
use chrono::Utc;
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI arguments: {:?}", cli);

    // 驗證參數與配置
    let config = match cli
        .validate()
        .and_then(|_| cli.load_shop_config())
        .and_then(|config| config.validate().map(|_| config))
    {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&cli, &config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(cli: &CliConfig, config: &ShopConfig) -> Result<()> {
    match &cli.command {
        Command::Catalog => show_catalog(config).await,
        Command::Cart(command) => run_cart(command, config).await,
        Command::Quote { postcode } => {
            let quote = quoter(config).quote(postcode).await?;
            println!("📮 {}", quote.postcode);
            println!("🚚 {}", quote.describe());
            Ok(())
        }
        Command::Checkout(args) => run_checkout(args, config).await,
        Command::Simulate(args) => run_simulation(args, config, cli.monitor),
    }
}

fn storefront(config: &ShopConfig) -> Storefront<SanityClient> {
    let content = &config.content;
    let mut client = SanityClient::new(
        &content.project_id,
        &content.dataset,
        &content.api_version,
        content.use_cdn,
    );
    if let Some(base_url) = &content.base_url {
        client = client.with_base_url(base_url);
    }
    Storefront::new(client)
}

fn quoter(config: &ShopConfig) -> DeliveryQuoter<PostcodesIoClient> {
    DeliveryQuoter::new(
        PostcodesIoClient::new(config.delivery.postcode_api()),
        config.delivery.policy(),
    )
}

async fn open_cart(config: &ShopConfig) -> CartStore<LocalStorage> {
    CartStore::open(LocalStorage::new(config.storage.path())).await
}

async fn show_catalog(config: &ShopConfig) -> Result<()> {
    let storefront = storefront(config);
    let catalog = storefront.catalog().await;

    println!("🌹 {}", catalog.page.title());
    println!("   {}", catalog.page.hero_text());
    println!();
    println!("Bouquets:");
    for product in &catalog.products {
        println!("  [{}] {} - {}", product.id, product.name, product.price);
    }
    println!();
    println!("Gallery (order something similar):");
    for image in &catalog.carousel {
        match image.starting_price() {
            Some(price) => println!("  [{}] {} - From {}", image.id, image.title, price),
            None => println!("  [{}] {}", image.id, image.title),
        }
    }
    println!();
    println!(
        "{} testimonials, {} FAQ entries",
        catalog.testimonials.len(),
        catalog.faq.questions.len()
    );
    Ok(())
}

async fn run_cart(command: &CartCommand, config: &ShopConfig) -> Result<()> {
    let mut store = open_cart(config).await;

    match command {
        CartCommand::List => {}
        CartCommand::Add {
            product_id,
            quantity,
        } => {
            let storefront = storefront(config);
            let catalog = storefront.catalog().await;
            let product = catalog
                .find_product(product_id)
                .ok_or_else(|| ShopError::CartError {
                    message: format!("no bouquet with id '{}'", product_id),
                })?;
            store.add_product(product, *quantity).await?;
            println!("✅ Added {} x {}", quantity, product.name);
        }
        CartCommand::Customize {
            image_id,
            size,
            add_ons,
            quantity,
        } => {
            let storefront = storefront(config);
            let catalog = storefront.catalog().await;
            let image = catalog
                .find_carousel_image(image_id)
                .ok_or_else(|| ShopError::CartError {
                    message: format!("no gallery image with id '{}'", image_id),
                })?;

            let mut custom = Customization::new(image);
            if let Some(size) = size {
                custom.select_size(size)?;
            }
            for arg in add_ons {
                let (id, details) = parse_add_on(arg);
                custom.toggle_add_on(&id)?;
                if let Some(details) = details {
                    custom.set_detail(&id, details);
                }
            }
            custom.set_quantity(*quantity);

            let item = custom.build(Utc::now())?;
            println!("✅ Added {} ({})", item.name, item.total_price);
            store.add_custom(item).await?;
        }
        CartCommand::Remove { id } => {
            if !store.remove(id).await? {
                return Err(ShopError::CartError {
                    message: format!("'{}' is not in the basket", id),
                });
            }
        }
        CartCommand::Quantity { id, delta } => {
            if !store.update_quantity(id, *delta).await? {
                return Err(ShopError::CartError {
                    message: format!("'{}' is not in the basket", id),
                });
            }
        }
        CartCommand::Clear => store.clear().await?,
    }

    print_cart(&store);
    Ok(())
}

fn print_cart(store: &CartStore<LocalStorage>) {
    let cart = store.cart();
    if cart.is_empty() {
        println!("🛒 Your basket is empty");
        return;
    }

    println!("🛒 {} item(s)", cart.count());
    for item in cart.items() {
        println!(
            "  [{}] {} x {} = {}",
            item.product.id,
            item.quantity,
            item.product.name,
            item.line_total()
        );
    }
    for item in cart.custom_items() {
        println!(
            "  [{}] {} x {} ({}) = {}",
            item.id, item.quantity, item.name, item.size.name, item.total_price
        );
        for add_on in &item.add_ons {
            match item.add_on_details.get(&add_on.id) {
                Some(details) => println!("      + {}: {}", add_on.name, details),
                None => println!("      + {}", add_on.name),
            }
        }
    }
    println!("  Subtotal: {}", cart.subtotal());
}

async fn run_checkout(args: &CheckoutArgs, config: &ShopConfig) -> Result<()> {
    let mut store = open_cart(config).await;
    let now = Utc::now();

    // 郵遞區號查不到時仍要列出所有表單錯誤
    let quote: Option<DeliveryQuote> = match quoter(config).quote(&args.postcode).await {
        Ok(quote) => Some(quote),
        Err(e) => {
            tracing::warn!("⚠️ No delivery quote for {}: {}", normalize_postcode(&args.postcode), e);
            None
        }
    };

    let form = CheckoutForm {
        name: args.name.clone(),
        email: args.email.clone(),
        phone: args.phone.clone(),
        address: args.address.clone(),
        postcode: args.postcode.clone(),
        delivery_date: Some(args.date),
        card_message: args.card_message.clone(),
        notes: args.notes.clone(),
        accepted_terms: args.accept_terms,
    };
    let order = Checkout::prepare(form, store.cart(), quote.as_ref(), now)?;

    let channel = args
        .channel
        .map(ChannelKind::from)
        .unwrap_or_else(|| config.orders.default_channel());
    let messaging = MessagingHandoff::new(config.orders.messaging());

    let receipt = match (channel, &config.orders.email) {
        (ChannelKind::Email, Some(email_config)) => {
            let relay = EmailRelay::new(email_config.clone());
            match relay.submit(&order).await {
                Ok(receipt) => receipt,
                Err(e) => {
                    let handoff = messaging.handoff(&order);
                    eprintln!("⚠️ Email failed. Send your order as a message instead:");
                    println!("{}", handoff.message);
                    println!();
                    println!("👉 {}", handoff.link);
                    return Err(e);
                }
            }
        }
        (ChannelKind::Email, None) => {
            if args.channel.is_some() {
                validate_required_field("orders.email", &config.orders.email)?;
            }
            tracing::warn!("⚠️ Email is not configured, using messaging");
            messaging.submit(&order).await?
        }
        (ChannelKind::Messaging, _) => messaging.submit(&order).await?,
    };

    println!("✅ Order {} via {}", receipt.reference, receipt.channel);
    for warning in &receipt.warnings {
        eprintln!("⚠️ {}", warning);
    }
    if let Some(handoff) = &receipt.handoff {
        println!("Copy this message and send it to us:");
        println!();
        println!("{}", handoff.message);
        println!();
        println!("👉 {}", handoff.link);
    }
    println!("Total: {}", order.total);

    store.clear().await?;
    Ok(())
}

fn run_simulation(args: &SimulateArgs, config: &ShopConfig, monitor: bool) -> Result<()> {
    let field_config = &config.field;
    let seed = args.seed.unwrap_or(field_config.seed);
    let path = match args.pointer {
        PointerArg::Idle => PointerPath::Idle,
        PointerArg::Circle => PointerPath::Circle {
            radius: 0.6,
            period_secs: 6.0,
        },
        PointerArg::Sweep => PointerPath::Sweep { period_secs: 4.0 },
    };

    let field = ParticleField::spawn(
        field_config.particles,
        seed,
        field_config.params,
        field_config.viewport,
    );
    let mut simulation = Simulation::new(field).with_frame_rate(field_config.frame_rate);
    if args.csv.is_some() {
        simulation = simulation.recording();
    }

    let mut monitor = SystemMonitor::new(monitor);
    if monitor.is_enabled() {
        tracing::info!("🔍 System monitoring enabled");
    }
    tracing::info!(
        "🌸 Simulating {} particles for {} frames (seed {}, pointer {:?})",
        field_config.particles,
        args.frames,
        seed,
        path
    );

    // 分段執行以便記錄各階段資源使用
    let chunk = (args.frames / 4).max(1);
    let mut remaining = args.frames;
    let mut phase = 0;
    let mut summary: Option<RunSummary> = None;
    while remaining > 0 {
        phase += 1;
        let frames = remaining.min(chunk);
        let part = simulation.run(frames, &path);
        summary = Some(match summary {
            Some(earlier) => earlier.then(part),
            None => part,
        });
        remaining -= frames;
        monitor.log_phase(&format!("phase {}", phase), simulation.frames());
    }
    monitor.log_summary(simulation.frames());

    if let Some(summary) = summary {
        println!("✅ {} frames, {} particles", summary.frames, summary.particles);
        println!("   max offset from home: {:.3}", summary.max_home_offset);
        println!("   max speed:            {:.4}", summary.max_speed);
        println!("   final mean speed:     {:.4}", summary.final_mean_speed);
    }

    if let (Some(csv_path), Some(trajectory)) = (&args.csv, simulation.trajectory()) {
        let file = std::fs::File::create(csv_path)?;
        trajectory.write_csv(file)?;
        println!("📁 Trajectory saved to: {}", csv_path);
    }

    Ok(())
}
