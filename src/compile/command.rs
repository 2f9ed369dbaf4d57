use super::plan::{AliasEntry, Arity, Field, FlagSet, ParserPlan, Placement};
use clap::{Arg, ArgAction, ArgGroup, Command, value_parser};

impl ParserPlan {
    /// Realises the plan as an engine command. Values are read back as raw
    /// strings; conversion and validation stay with the binder.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(self.name.clone()).args_override_self(true);
        if let Some(about) = &self.about {
            cmd = cmd.about(about.clone());
        }
        if let Some(usage) = &self.usage {
            cmd = cmd.override_usage(usage.clone());
        }
        if let Some(epilog) = &self.epilog {
            cmd = cmd.after_help(epilog.clone());
        }

        for (order, field) in self.fields.iter().enumerate() {
            cmd = cmd.arg(field_arg(field, order));
        }
        for alias in &self.aliases {
            cmd = cmd.arg(self.alias_arg(alias));
        }
        for cluster in &self.clusters {
            cmd = cmd.group(
                ArgGroup::new(cluster.id.clone())
                    .args(cluster.members.clone())
                    .multiple(cluster.multiple)
                    .required(cluster.required),
            );
        }

        for (name, plan) in &self.subcommands {
            cmd = cmd.subcommand(plan.command().name(name.clone()));
        }
        if self.subcommand_required {
            cmd = cmd.subcommand_required(true);
        }
        cmd
    }

    fn alias_arg(&self, alias: &AliasEntry) -> Arg {
        let order = self
            .fields
            .iter()
            .position(|f| f.name() == alias.target)
            .unwrap_or(self.fields.len());
        let target = self.fields.get(order);

        let primary = target
            .and_then(|f| match &f.placement {
                Placement::Flag(flags) => primary_flag(flags),
                Placement::Positional(_) => None,
            })
            .unwrap_or_else(|| alias.target.clone());

        let mut arg = with_flags(Arg::new(alias.id.clone()), &alias.flags)
            .action(ArgAction::SetTrue)
            .help(format!("Same as {primary} {}", alias.value))
            .display_order(order);
        if let Some(field) = target {
            arg = arg.hide(field.argument.is_hidden());
            if let Some(heading) = &field.heading {
                arg = arg.help_heading(heading.clone());
            }
        }
        arg
    }
}

fn primary_flag(flags: &FlagSet) -> Option<String> {
    flags
        .long
        .as_ref()
        .map(|l| format!("--{l}"))
        .or_else(|| flags.short.map(|c| format!("-{c}")))
}

fn with_flags(mut arg: Arg, flags: &FlagSet) -> Arg {
    if let Some(short) = flags.short {
        arg = arg.short(short);
    }
    if let Some(long) = &flags.long {
        arg = arg.long(long.clone());
    }
    if !flags.short_aliases.is_empty() {
        arg = arg.visible_short_aliases(flags.short_aliases.clone());
    }
    if !flags.long_aliases.is_empty() {
        arg = arg.visible_aliases(flags.long_aliases.clone());
    }
    arg
}

fn field_arg(field: &Field, order: usize) -> Arg {
    let argument = &field.argument;
    let mut arg = Arg::new(field.name().to_string())
        .required(field.required)
        .hide(argument.is_hidden())
        .display_order(order);

    arg = match &field.placement {
        Placement::Flag(flags) => with_flags(arg, flags),
        Placement::Positional(index) => arg.index(index + 1),
    };

    arg = match (field.arity, &field.placement) {
        (Arity::Switch, _) => arg.action(ArgAction::SetTrue),
        (Arity::One, _) => arg
            .action(ArgAction::Set)
            .num_args(1)
            .value_parser(value_parser!(String)),
        (Arity::Many, Placement::Flag(_)) => arg
            .action(ArgAction::Append)
            .num_args(1)
            .value_parser(value_parser!(String)),
        (Arity::Many, Placement::Positional(_)) => {
            let arg = arg.action(ArgAction::Append).value_parser(value_parser!(String));
            if field.required {
                arg.num_args(1..)
            } else {
                arg.num_args(0..)
            }
        }
    };

    if field.arity != Arity::Switch && argument.value_type().is_numeric() {
        arg = arg.allow_negative_numbers(true);
    }
    if let Some(metavar) = argument.metavar() {
        arg = arg.value_name(metavar);
    }
    if let Some(help) = &field.help {
        arg = arg.help(help.clone());
    }
    if let Some(heading) = &field.heading {
        arg = arg.help_heading(heading.clone());
    }
    arg
}
