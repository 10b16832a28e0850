//! Fixed component catalog.
//!
//! Every diagram node label and icon name must come from this table. Prompt
//! composition, output validation and the render-time icon resolver all read
//! from [`Component::ALL`], so adding a component here is the only change
//! needed to make it generatable and renderable.

/// Icon rendered for a node whose icon name is not in the catalog.
pub const FALLBACK_ICON: &str = "HelpCircle";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    User,
    WebClient,
    MobileClient,
    Dns,
    Cdn,
    LoadBalancer,
    ApiGateway,
    WebServer,
    ApplicationServer,
    Microservice,
    ServerlessFunction,
    AuthService,
    RateLimiter,
    Cache,
    Database,
    NoSqlDatabase,
    ObjectStorage,
    MessageQueue,
    StreamProcessor,
    SearchEngine,
    DataWarehouse,
    Worker,
    Scheduler,
    NotificationService,
    Monitoring,
    Logging,
    Firewall,
    ContainerOrchestrator,
    ThirdPartyApi,
}

impl Component {
    pub const ALL: [Component; 29] = [
        Component::User,
        Component::WebClient,
        Component::MobileClient,
        Component::Dns,
        Component::Cdn,
        Component::LoadBalancer,
        Component::ApiGateway,
        Component::WebServer,
        Component::ApplicationServer,
        Component::Microservice,
        Component::ServerlessFunction,
        Component::AuthService,
        Component::RateLimiter,
        Component::Cache,
        Component::Database,
        Component::NoSqlDatabase,
        Component::ObjectStorage,
        Component::MessageQueue,
        Component::StreamProcessor,
        Component::SearchEngine,
        Component::DataWarehouse,
        Component::Worker,
        Component::Scheduler,
        Component::NotificationService,
        Component::Monitoring,
        Component::Logging,
        Component::Firewall,
        Component::ContainerOrchestrator,
        Component::ThirdPartyApi,
    ];

    /// Display name, used verbatim as `data.label`.
    pub fn name(self) -> &'static str {
        match self {
            Component::User => "User",
            Component::WebClient => "Web Client",
            Component::MobileClient => "Mobile Client",
            Component::Dns => "DNS",
            Component::Cdn => "CDN",
            Component::LoadBalancer => "Load Balancer",
            Component::ApiGateway => "API Gateway",
            Component::WebServer => "Web Server",
            Component::ApplicationServer => "Application Server",
            Component::Microservice => "Microservice",
            Component::ServerlessFunction => "Serverless Function",
            Component::AuthService => "Auth Service",
            Component::RateLimiter => "Rate Limiter",
            Component::Cache => "Cache",
            Component::Database => "Database",
            Component::NoSqlDatabase => "NoSQL Database",
            Component::ObjectStorage => "Object Storage",
            Component::MessageQueue => "Message Queue",
            Component::StreamProcessor => "Stream Processor",
            Component::SearchEngine => "Search Engine",
            Component::DataWarehouse => "Data Warehouse",
            Component::Worker => "Worker",
            Component::Scheduler => "Scheduler",
            Component::NotificationService => "Notification Service",
            Component::Monitoring => "Monitoring",
            Component::Logging => "Logging",
            Component::Firewall => "Firewall",
            Component::ContainerOrchestrator => "Container Orchestrator",
            Component::ThirdPartyApi => "Third-Party API",
        }
    }

    /// Icon identifier, used verbatim as `data.iconName`.
    pub fn icon(self) -> &'static str {
        match self {
            Component::User => "User",
            Component::WebClient => "Monitor",
            Component::MobileClient => "Smartphone",
            Component::Dns => "Globe",
            Component::Cdn => "Cloud",
            Component::LoadBalancer => "Network",
            Component::ApiGateway => "Router",
            Component::WebServer => "Server",
            Component::ApplicationServer => "Cpu",
            Component::Microservice => "Boxes",
            Component::ServerlessFunction => "Zap",
            Component::AuthService => "ShieldCheck",
            Component::RateLimiter => "Gauge",
            Component::Cache => "MemoryStick",
            Component::Database => "Database",
            Component::NoSqlDatabase => "Layers",
            Component::ObjectStorage => "HardDrive",
            Component::MessageQueue => "MessageSquare",
            Component::StreamProcessor => "Workflow",
            Component::SearchEngine => "Search",
            Component::DataWarehouse => "Warehouse",
            Component::Worker => "Cog",
            Component::Scheduler => "Clock",
            Component::NotificationService => "Bell",
            Component::Monitoring => "Activity",
            Component::Logging => "ScrollText",
            Component::Firewall => "Shield",
            Component::ContainerOrchestrator => "Container",
            Component::ThirdPartyApi => "Plug",
        }
    }

    /// Exact lookup by display name.
    pub fn from_name(name: &str) -> Option<Component> {
        Component::ALL.iter().copied().find(|c| c.name() == name)
    }

    pub fn from_icon(icon: &str) -> Option<Component> {
        Component::ALL.iter().copied().find(|c| c.icon() == icon)
    }
}

pub fn is_known_icon(icon: &str) -> bool {
    Component::from_icon(icon).is_some()
}

/// Render-time icon resolution: known icons pass through, anything else
/// maps to [`FALLBACK_ICON`].
pub fn resolve_icon(icon: &str) -> &'static str {
    Component::from_icon(icon)
        .map(Component::icon)
        .unwrap_or(FALLBACK_ICON)
}

/// One line per component, `- <name> (icon: <icon>)`, for prompt text.
pub fn catalog_listing() -> String {
    let mut out = String::with_capacity(Component::ALL.len() * 40);
    for c in Component::ALL {
        out.push_str("- ");
        out.push_str(c.name());
        out.push_str(" (icon: ");
        out.push_str(c.icon());
        out.push_str(")\n");
    }
    out
}
