// crates/config-groups-cli/src/main.rs
// ============================================================================
// Module: Config Groups CLI Entry Point
// Description: Command dispatcher for configuration group workflows.
// Purpose: Manage groups, instances, and rules from the command line.
// Dependencies: clap, config-groups-config, config-groups-core, serde_json.
// ============================================================================

//! ## Overview
//! The `config-groups` CLI wires the configuration file, rule table, store,
//! template renderer, and audit sink into a [`ConfigurationService`] and runs
//! one command against it. Results are printed as pretty JSON on stdout;
//! failures go to stderr with the error kind and a failure exit code.
//! User-facing strings are routed through the message catalog.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use config_groups_cli::control::TemplateInstanceControl;
use config_groups_cli::t;
use config_groups_config::ConfigGroupsConfig;
use config_groups_core::ConfigurationAuditSink;
use config_groups_core::ConfigurationError;
use config_groups_core::ConfigurationService;
use config_groups_core::FileAuditSink;
use config_groups_core::FlavorSpec;
use config_groups_core::GroupChanges;
use config_groups_core::GroupId;
use config_groups_core::InMemoryConfigurationStore;
use config_groups_core::InstanceId;
use config_groups_core::InstanceRecord;
use config_groups_core::InstanceStatus;
use config_groups_core::NewGroup;
use config_groups_core::NoopAuditSink;
use config_groups_core::ProposedValues;
use config_groups_core::RuleTable;
use config_groups_core::SharedConfigurationStore;
use config_groups_core::StderrAuditSink;
use config_groups_core::TenantId;
use config_groups_store_sqlite::SqliteConfigurationStore;
use config_groups_template::TemplateRenderer;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum size of a values document read from disk.
const MAX_VALUES_BYTES: usize = 256 * 1024;
/// Tenant used when `--tenant` is omitted.
const DEFAULT_TENANT: &str = "default";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "config-groups", version, disable_help_subcommand = true)]
struct Cli {
    /// Config file path (overrides `CONFIG_GROUPS_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Tenant that owns the groups and instances being managed.
    #[arg(long, value_name = "TENANT", global = true, default_value = DEFAULT_TENANT)]
    tenant: String,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Configuration file utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Inspect parameter rules.
    Parameters {
        /// Selected parameters subcommand.
        #[command(subcommand)]
        command: ParametersCommand,
    },
    /// Manage configuration groups.
    Groups {
        /// Selected groups subcommand.
        #[command(subcommand)]
        command: GroupsCommand,
    },
    /// Manage instances and their group association.
    Instances {
        /// Selected instances subcommand.
        #[command(subcommand)]
        command: InstancesCommand,
    },
    /// Validate values against the parameter rules without storing them.
    Validate(ValuesArgs),
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate the configuration file and the rule document it names.
    Validate,
}

/// Parameter rule subcommands.
#[derive(Subcommand, Debug)]
enum ParametersCommand {
    /// List every parameter rule.
    List,
    /// Show one parameter rule.
    Show {
        /// Parameter name.
        name: String,
    },
}

/// Group subcommands.
#[derive(Subcommand, Debug)]
enum GroupsCommand {
    /// List the tenant's groups.
    List,
    /// Show a group with its values and instances.
    Show(GroupIdArg),
    /// List the instances attached to a group.
    Instances(GroupIdArg),
    /// Create a group.
    Create(GroupCreateCommand),
    /// Merge values into a group and push them to attached instances.
    Edit(GroupEditCommand),
    /// Replace group fields and push new values to attached instances.
    Update(GroupUpdateCommand),
    /// Delete a group with no attached instances.
    Delete(GroupIdArg),
}

/// Instance subcommands.
#[derive(Subcommand, Debug)]
enum InstancesCommand {
    /// List the tenant's instances.
    List,
    /// Register an instance with no group assigned.
    Register(InstanceRegisterCommand),
    /// Assign a group to an instance and deliver its values.
    Assign {
        /// Instance identifier.
        instance: String,
        /// Group identifier; an empty value unassigns.
        group: String,
    },
    /// Clear an instance's group.
    Unassign(InstanceIdArg),
    /// Mark an instance active after its engine restarted.
    Restart(InstanceIdArg),
    /// Render the engine defaults for an instance.
    DefaultConfig(InstanceIdArg),
}

/// Group identifier argument.
#[derive(Args, Debug)]
struct GroupIdArg {
    /// Group identifier.
    id: String,
}

/// Instance identifier argument.
#[derive(Args, Debug)]
struct InstanceIdArg {
    /// Instance identifier.
    instance: String,
}

/// Values supplied inline or from a file.
#[derive(Args, Debug, Default)]
struct ValuesArgs {
    /// JSON object of parameter values.
    #[arg(long, value_name = "JSON", conflicts_with = "values_file")]
    values: Option<String>,
    /// Path to a JSON object of parameter values.
    #[arg(long, value_name = "PATH")]
    values_file: Option<PathBuf>,
}

/// Arguments for `groups create`.
#[derive(Args, Debug)]
struct GroupCreateCommand {
    /// Display name.
    #[arg(long)]
    name: String,
    /// Optional description.
    #[arg(long)]
    description: Option<String>,
    /// Initial values.
    #[command(flatten)]
    values: ValuesArgs,
}

/// Arguments for `groups edit`.
#[derive(Args, Debug)]
struct GroupEditCommand {
    /// Group identifier.
    id: String,
    /// Values to merge.
    #[command(flatten)]
    values: ValuesArgs,
}

/// Arguments for `groups update`.
#[derive(Args, Debug)]
struct GroupUpdateCommand {
    /// Group identifier.
    id: String,
    /// Replacement name.
    #[arg(long)]
    name: Option<String>,
    /// Replacement description.
    #[arg(long)]
    description: Option<String>,
    /// Replacement values.
    #[command(flatten)]
    values: ValuesArgs,
}

/// Arguments for `instances register`.
#[derive(Args, Debug)]
struct InstanceRegisterCommand {
    /// Instance identifier.
    #[arg(long)]
    id: String,
    /// Display name.
    #[arg(long)]
    name: String,
    /// Engine type.
    #[arg(long, default_value = "mysql")]
    service_type: String,
    /// Flavor identifier.
    #[arg(long)]
    flavor_id: String,
    /// Flavor display name.
    #[arg(long)]
    flavor_name: String,
    /// Flavor memory in megabytes.
    #[arg(long)]
    ram: u64,
    /// Flavor virtual CPUs.
    #[arg(long, default_value_t = 1)]
    vcpus: u32,
    /// Flavor root disk in gigabytes.
    #[arg(long, default_value_t = 0)]
    disk: u64,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing failures.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a catalog message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

impl From<ConfigurationError> for CliError {
    fn from(error: ConfigurationError) -> Self {
        Self::new(t!("command.failed", kind = error.kind(), error = error))
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

/// Errors raised by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// The file could not be read.
    Io(std::io::Error),
    /// The file exceeds the allowed size.
    TooLarge {
        /// Observed size in bytes.
        size: u64,
        /// Allowed size in bytes.
        limit: usize,
    },
}

// ============================================================================
// SECTION: Runtime
// ============================================================================

/// Service type used by the CLI.
type CliService = ConfigurationService<SharedConfigurationStore, TemplateInstanceControl>;

/// Everything a command needs, built from the configuration file.
struct Runtime {
    /// Lifecycle service.
    service: CliService,
    /// Template renderer shared with instance control.
    renderer: Arc<TemplateRenderer>,
    /// Tenant scope.
    tenant: TenantId,
}

/// Loads the configuration file.
fn load_config(path: Option<&Path>) -> CliResult<ConfigGroupsConfig> {
    ConfigGroupsConfig::load(path).map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

/// Loads the rule table named by the configuration.
fn load_rules(config: &ConfigGroupsConfig) -> CliResult<RuleTable> {
    RuleTable::load(&config.rules.path).map_err(|err| {
        CliError::new(t!("rules.load_failed", path = config.rules.path.display(), error = err))
    })
}

/// Opens the store selected by the configuration.
fn open_store(config: &ConfigGroupsConfig) -> CliResult<SharedConfigurationStore> {
    match config.store.sqlite() {
        Some(sqlite) => {
            let store = SqliteConfigurationStore::new(&sqlite).map_err(|err| {
                CliError::new(t!("store.open_failed", path = sqlite.path.display(), error = err))
            })?;
            Ok(SharedConfigurationStore::from_store(store))
        }
        None => Ok(SharedConfigurationStore::from_store(InMemoryConfigurationStore::new())),
    }
}

/// Builds the audit sink selected by the configuration.
fn open_audit(config: &ConfigGroupsConfig) -> CliResult<Arc<dyn ConfigurationAuditSink>> {
    if !config.audit.enabled {
        return Ok(Arc::new(NoopAuditSink));
    }
    match &config.audit.path {
        Some(path) => {
            let sink = FileAuditSink::new(Path::new(path))
                .map_err(|err| CliError::new(t!("audit.open_failed", path = path, error = err)))?;
            Ok(Arc::new(sink))
        }
        None => Ok(Arc::new(StderrAuditSink)),
    }
}

/// Builds the runtime for service-backed commands.
fn open_runtime(cli: &Cli) -> CliResult<Runtime> {
    let tenant = parse_tenant(&cli.tenant)?;
    let config = load_config(cli.config.as_deref())?;
    let rules = load_rules(&config)?;
    let store = open_store(&config)?;
    let audit = open_audit(&config)?;
    let renderer = Arc::new(TemplateRenderer::new(config.templates.search_paths.clone()));
    let control = TemplateInstanceControl::new(Arc::clone(&renderer));
    let service = ConfigurationService::new(rules, store, control).with_audit(audit);
    Ok(Runtime {
        service,
        renderer,
        tenant,
    })
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Config {
            command: ConfigCommand::Validate,
        } => command_config_validate(&cli),
        Commands::Validate(values) => command_validate(&cli, values),
        Commands::Parameters {
            command,
        } => command_parameters(&open_runtime(&cli)?, command),
        Commands::Groups {
            command,
        } => command_groups(&open_runtime(&cli)?, command),
        Commands::Instances {
            command,
        } => command_instances(&open_runtime(&cli)?, command),
    }
}

// ============================================================================
// SECTION: Config and Validation Commands
// ============================================================================

/// Validates the configuration file and its rule document.
fn command_config_validate(cli: &Cli) -> CliResult<ExitCode> {
    let config = load_config(cli.config.as_deref())?;
    let rules = load_rules(&config)?;
    write_line(&t!("config.validate.ok", count = rules.len()))?;
    Ok(ExitCode::SUCCESS)
}

/// Validates values against the rule table only.
fn command_validate(cli: &Cli, args: &ValuesArgs) -> CliResult<ExitCode> {
    let config = load_config(cli.config.as_deref())?;
    let rules = load_rules(&config)?;
    let values = read_values(args)?.ok_or_else(|| CliError::new(t!("values.required")))?;
    config_groups_core::validate(&values, &rules)
        .map_err(|err| CliError::new(t!("command.failed", kind = err.kind(), error = err)))?;
    write_line(&t!("values.valid", count = values.len()))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Parameter Commands
// ============================================================================

/// Dispatches parameter subcommands.
fn command_parameters(runtime: &Runtime, command: &ParametersCommand) -> CliResult<ExitCode> {
    match command {
        ParametersCommand::List => write_json(&runtime.service.parameters())?,
        ParametersCommand::Show {
            name,
        } => write_json(&runtime.service.parameter(name)?)?,
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Group Commands
// ============================================================================

/// Dispatches group subcommands.
fn command_groups(runtime: &Runtime, command: &GroupsCommand) -> CliResult<ExitCode> {
    let service = &runtime.service;
    let tenant = &runtime.tenant;
    match command {
        GroupsCommand::List => write_json(&service.list(tenant)?)?,
        GroupsCommand::Show(arg) => write_json(&service.show(tenant, &GroupId::new(&arg.id))?)?,
        GroupsCommand::Instances(arg) => {
            write_json(&service.instances(tenant, &GroupId::new(&arg.id))?)?;
        }
        GroupsCommand::Create(command) => {
            let request = NewGroup {
                name: command.name.clone(),
                description: command.description.clone(),
                values: read_values(&command.values)?.unwrap_or_default(),
            };
            write_json(&service.create(tenant, request)?)?;
        }
        GroupsCommand::Edit(command) => {
            let values =
                read_values(&command.values)?.ok_or_else(|| CliError::new(t!("values.required")))?;
            let outcome = service.edit(tenant, &GroupId::new(&command.id), &values)?;
            write_json(&outcome)?;
            warn_failed_deliveries(outcome.propagation.failures().count())?;
        }
        GroupsCommand::Update(command) => {
            let changes = GroupChanges {
                name: command.name.clone(),
                description: command.description.clone(),
                values: read_values(&command.values)?,
            };
            let outcome = service.update(tenant, &GroupId::new(&command.id), changes)?;
            write_json(&outcome)?;
            warn_failed_deliveries(outcome.propagation.failures().count())?;
        }
        GroupsCommand::Delete(arg) => {
            service.delete(tenant, &GroupId::new(&arg.id))?;
            write_line(&t!("groups.delete.ok", id = arg.id))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Instance Commands
// ============================================================================

/// JSON body for assign and unassign results.
#[derive(Debug, Serialize)]
struct AssignmentOutput<'a> {
    /// Instance identifier.
    instance_id: &'a str,
    /// Group now assigned, if any.
    configuration_id: Option<&'a GroupId>,
    /// Delivery result; absent when nothing was delivered.
    delivery: Option<config_groups_core::InstancePropagation>,
}

/// Dispatches instance subcommands.
fn command_instances(runtime: &Runtime, command: &InstancesCommand) -> CliResult<ExitCode> {
    let service = &runtime.service;
    let tenant = &runtime.tenant;
    match command {
        InstancesCommand::List => write_json(&service.list_instances(tenant)?)?,
        InstancesCommand::Register(command) => {
            let record = instance_record(tenant, command);
            service.register_instance(&record)?;
            write_json(&record)?;
        }
        InstancesCommand::Assign {
            instance,
            group,
        } => {
            let group_id = parse_group_reference(group);
            let delivery =
                service.assign(tenant, &InstanceId::new(instance), group_id.as_ref())?;
            write_json(&AssignmentOutput {
                instance_id: instance,
                configuration_id: group_id.as_ref(),
                delivery,
            })?;
        }
        InstancesCommand::Unassign(arg) => {
            let delivery = service.unassign(tenant, &InstanceId::new(&arg.instance))?;
            write_json(&AssignmentOutput {
                instance_id: &arg.instance,
                configuration_id: None,
                delivery,
            })?;
        }
        InstancesCommand::Restart(arg) => {
            write_json(&service.restart(tenant, &InstanceId::new(&arg.instance))?)?;
        }
        InstancesCommand::DefaultConfig(arg) => {
            let record = service.instance(tenant, &InstanceId::new(&arg.instance))?;
            let view = runtime.renderer.default_configuration(&record).map_err(|err| {
                CliError::new(t!("command.failed", kind = err.kind(), error = err))
            })?;
            write_json(&view)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Builds an unassigned instance record from CLI arguments.
fn instance_record(tenant: &TenantId, command: &InstanceRegisterCommand) -> InstanceRecord {
    InstanceRecord {
        id: InstanceId::new(&command.id),
        tenant_id: tenant.clone(),
        name: command.name.clone(),
        service_type: command.service_type.clone(),
        flavor: FlavorSpec {
            id: command.flavor_id.clone(),
            name: command.flavor_name.clone(),
            ram: command.ram,
            vcpus: command.vcpus,
            disk: command.disk,
        },
        configuration_id: None,
        status: InstanceStatus::Active,
    }
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Parses the tenant flag.
fn parse_tenant(raw: &str) -> CliResult<TenantId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CliError::new(t!("tenant.empty")));
    }
    Ok(TenantId::new(trimmed))
}

/// Parses a group reference; a blank reference means no group.
fn parse_group_reference(raw: &str) -> Option<GroupId> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| GroupId::new(trimmed))
}

/// Reads values from `--values` or `--values-file`.
fn read_values(args: &ValuesArgs) -> CliResult<Option<ProposedValues>> {
    let text = match (&args.values, &args.values_file) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) => read_values_file(path)?,
        (None, None) => return Ok(None),
    };
    parse_values(&text).map(Some)
}

/// Parses a JSON object into proposed values.
fn parse_values(text: &str) -> CliResult<ProposedValues> {
    let parsed: Value = serde_json::from_str(text)
        .map_err(|err| CliError::new(t!("values.parse_failed", error = err)))?;
    let Value::Object(map) = parsed else {
        return Err(CliError::new(t!("values.not_object")));
    };
    Ok(map.into_iter().collect())
}

/// Reads a values file within the size limit.
fn read_values_file(path: &Path) -> CliResult<String> {
    let bytes = read_bytes_with_limit(path, MAX_VALUES_BYTES).map_err(|err| match err {
        ReadLimitError::Io(err) => {
            CliError::new(t!("input.read_failed", path = path.display(), error = err))
        }
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(t!("input.too_large", path = path.display(), size = size, limit = limit)),
    })?;
    String::from_utf8(bytes)
        .map_err(|_| CliError::new(t!("input.not_utf8", path = path.display())))
}

/// Reads a file while enforcing a maximum byte size.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let metadata = file.metadata().map_err(ReadLimitError::Io)?;
    let size = metadata.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }
    let mut limited = file.take(limit.saturating_add(1));
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        return Err(ReadLimitError::TooLarge {
            size: actual,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a value as pretty JSON to stdout.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(t!("output.json_failed", error = err)))?;
    write_line(&text)
}

/// Writes a line to stdout.
fn write_line(message: &str) -> CliResult<()> {
    write_stdout_line(message).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Warns on stderr when some deliveries failed.
fn warn_failed_deliveries(count: usize) -> CliResult<()> {
    if count == 0 {
        return Ok(());
    }
    write_stderr_line(&t!("propagation.partial", count = count))
        .map_err(|err| CliError::new(output_error("stderr", &err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    t!("output.write_failed", stream = stream, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
