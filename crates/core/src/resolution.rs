//! Turns a command's parameter list into concrete values.
//!
//! Parameters are resolved in declaration order. Hidden parameters produce
//! no value. A parameter with choices is answered from a pick list, every
//! other parameter by free text. Picking a choice may grant tags that make
//! later parameters and choices of the same command visible.

use log::debug;

use crate::command_definitions::{ChoiceDefinition, CommandDefinition, ParameterDefinition};
use crate::error::{Error, Result};
use crate::interaction::{InputRequest, PickItem, PickRequest, Prompter};
use crate::recency::RecencyCache;
use crate::visibility::{is_visible, TagSet};

pub struct ParameterResolver<'a> {
    prompter: &'a mut dyn Prompter,
    recency: &'a mut RecencyCache,
    clock: fn() -> u64,
}

impl<'a> ParameterResolver<'a> {
    pub fn new(
        prompter: &'a mut dyn Prompter,
        recency: &'a mut RecencyCache,
        clock: fn() -> u64,
    ) -> Self {
        Self {
            prompter,
            recency,
            clock,
        }
    }

    /// Resolves every visible parameter of `command`.
    ///
    /// `seed` is copied; tags granted by picked choices only live for this
    /// call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UserCancelled`] as soon as any prompt is dismissed,
    /// or whatever error the prompter reports.
    pub fn resolve(&mut self, command: &CommandDefinition, seed: &TagSet) -> Result<Vec<String>> {
        let mut active_tags = seed.clone();
        let mut values = Vec::new();

        for parameter in &command.parameters {
            if !is_visible(parameter, &active_tags) {
                debug!("Skipping hidden parameter `{}`", parameter.name);
                continue;
            }

            let value = match parameter.choice_list() {
                Some(choices) => self.pick_choice(parameter, choices, &mut active_tags)?,
                None => self.read_text(command, parameter, &values)?,
            };

            debug!("Resolved `{}` to `{value}`", parameter.name);
            values.push(value);
        }

        Ok(values)
    }

    fn pick_choice(
        &mut self,
        parameter: &ParameterDefinition,
        choices: &[ChoiceDefinition],
        active_tags: &mut TagSet,
    ) -> Result<String> {
        let mut visible: Vec<&ChoiceDefinition> = choices
            .iter()
            .filter(|choice| is_visible(*choice, &*active_tags))
            .collect();

        if parameter.sort_by_time {
            self.recency.sort_by_recency(&mut visible);
        }

        let items: Vec<PickItem> = visible
            .iter()
            .map(|choice| PickItem {
                label: choice.label.clone(),
                description: choice.description.clone(),
            })
            .collect();

        let title = parameter
            .placeholder
            .clone()
            .unwrap_or_else(|| format!("Pick `{}`", parameter.name));

        let picked = self.prompter.pick_one(&PickRequest {
            title: &title,
            items: &items,
        })?;

        let Some(index) = picked else {
            return Err(Error::UserCancelled);
        };

        let choice = visible
            .get(index)
            .ok_or_else(|| Error::Misc(format!("Picked choice {index} does not exist")))?;

        self.recency.touch(choice, (self.clock)());

        if let Some(add_tags) = &choice.add_tags {
            active_tags.extend(add_tags.iter().cloned());
        }

        Ok(choice.label.trim().to_string())
    }

    fn read_text(
        &mut self,
        command: &CommandDefinition,
        parameter: &ParameterDefinition,
        collected: &[String],
    ) -> Result<String> {
        let prompt = format!(
            "For `{}` enter `{}`",
            command.build_command_line(collected),
            parameter.name
        );

        let input = self.prompter.input_text(&InputRequest {
            prompt: &prompt,
            placeholder: parameter.placeholder.as_deref(),
            initial_value: parameter.default.as_deref(),
        })?;

        match input {
            Some(value) => Ok(value.trim().to_string()),
            None => Err(Error::UserCancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_definitions::TagList;
    use crate::recency::identity;
    use crate::visibility::seed_tags;
    use std::collections::VecDeque;

    enum Answer {
        Pick(Option<usize>),
        Text(Option<&'static str>),
    }

    /// Replays scripted answers and records what was asked.
    #[derive(Default)]
    struct ScriptedPrompter {
        answers: VecDeque<Answer>,
        presented: Vec<Vec<String>>,
        prompts: Vec<String>,
        initial_values: Vec<Option<String>>,
    }

    impl ScriptedPrompter {
        fn new(answers: Vec<Answer>) -> Self {
            Self {
                answers: answers.into(),
                ..Self::default()
            }
        }
    }

    impl Prompter for ScriptedPrompter {
        fn pick_one(&mut self, request: &PickRequest<'_>) -> Result<Option<usize>> {
            self.presented
                .push(request.items.iter().map(|i| i.label.clone()).collect());
            match self.answers.pop_front() {
                Some(Answer::Pick(answer)) => Ok(answer),
                _ => panic!("unexpected pick prompt"),
            }
        }

        fn pick_many(&mut self, _request: &PickRequest<'_>) -> Result<Vec<usize>> {
            panic!("unexpected multi pick prompt")
        }

        fn input_text(&mut self, request: &InputRequest<'_>) -> Result<Option<String>> {
            self.prompts.push(request.prompt.to_string());
            self.initial_values
                .push(request.initial_value.map(ToString::to_string));
            match self.answers.pop_front() {
                Some(Answer::Text(answer)) => Ok(answer.map(ToString::to_string)),
                _ => panic!("unexpected text prompt"),
            }
        }
    }

    fn fixed_clock() -> u64 {
        5_000
    }

    fn tags(values: &[&str]) -> Option<TagList> {
        Some(values.iter().map(ToString::to_string).collect())
    }

    fn choice(label: &str, choice_tags: &[&str]) -> ChoiceDefinition {
        ChoiceDefinition {
            tags: (!choice_tags.is_empty()).then(|| tags(choice_tags)).flatten(),
            ..ChoiceDefinition::new(label)
        }
    }

    fn resolve(
        command: &CommandDefinition,
        seed: &TagSet,
        prompter: &mut ScriptedPrompter,
        recency: &mut RecencyCache,
    ) -> Result<Vec<String>> {
        ParameterResolver::new(prompter, recency, fixed_clock).resolve(command, seed)
    }

    #[test]
    fn test_no_visible_parameters_resolves_without_prompting() {
        let mut command = CommandDefinition::new("cmd", "ls");
        let mut hidden = ParameterDefinition::free_text("hidden");
        hidden.tags = tags(&["x"]);
        command.parameters.push(hidden);

        let mut prompter = ScriptedPrompter::new(vec![]);
        let mut recency = RecencyCache::new();

        let values = resolve(&command, &TagSet::new(), &mut prompter, &mut recency).unwrap();
        assert!(values.is_empty());
        assert!(prompter.prompts.is_empty());
        assert!(prompter.presented.is_empty());
    }

    #[test]
    fn test_free_text_values_are_trimmed_and_ordered() {
        let mut command = CommandDefinition::new("cmd", "scp");
        let mut source = ParameterDefinition::free_text("source");
        source.default = Some("./out".to_string());
        command.parameters.push(source);
        command
            .parameters
            .push(ParameterDefinition::free_text("target"));

        let mut prompter =
            ScriptedPrompter::new(vec![Answer::Text(Some(" a.txt ")), Answer::Text(Some("host:"))]);
        let mut recency = RecencyCache::new();

        let values = resolve(&command, &TagSet::new(), &mut prompter, &mut recency).unwrap();
        assert_eq!(values, vec!["a.txt", "host:"]);
        assert_eq!(prompter.prompts[0], "For `scp` enter `source`");
        assert_eq!(prompter.prompts[1], "For `scp a.txt` enter `target`");
        assert_eq!(prompter.initial_values[0].as_deref(), Some("./out"));
        assert_eq!(prompter.initial_values[1], None);
    }

    #[test]
    fn test_dismissed_text_is_user_cancelled() {
        let mut command = CommandDefinition::new("cmd", "echo");
        command.parameters.push(ParameterDefinition::free_text("p"));

        let mut prompter = ScriptedPrompter::new(vec![Answer::Text(None)]);
        let mut recency = RecencyCache::new();

        let result = resolve(&command, &TagSet::new(), &mut prompter, &mut recency);
        assert!(matches!(result, Err(Error::UserCancelled)));
    }

    #[test]
    fn test_tagged_choices_are_filtered() {
        let mut command = CommandDefinition::new("cmd", "echo");
        command.parameters.push(ParameterDefinition::with_choices(
            "p",
            vec![choice("a", &["x"]), choice("b", &[])],
        ));

        let mut prompter = ScriptedPrompter::new(vec![Answer::Pick(Some(0))]);
        let mut recency = RecencyCache::new();

        let values = resolve(&command, &TagSet::new(), &mut prompter, &mut recency).unwrap();
        assert_eq!(prompter.presented[0], vec!["b"]);
        assert_eq!(values, vec!["b"]);
    }

    #[test]
    fn test_sort_by_time_orders_most_recent_first() {
        let a = choice("a", &[]);
        let b = choice("b", &[]);

        let mut parameter = ParameterDefinition::with_choices("p", vec![a.clone(), b.clone()]);
        parameter.sort_by_time = true;
        let mut command = CommandDefinition::new("cmd", "echo");
        command.parameters.push(parameter);

        let mut recency = RecencyCache::new();
        recency.set(identity(&a), 100);
        recency.set(identity(&b), 200);

        let mut prompter = ScriptedPrompter::new(vec![Answer::Pick(Some(1))]);

        let values = resolve(&command, &TagSet::new(), &mut prompter, &mut recency).unwrap();
        assert_eq!(prompter.presented[0], vec!["b", "a"]);
        assert_eq!(values, vec!["a"]);
        assert_eq!(recency.get(&identity(&a)), Some(5_000));
        assert_eq!(recency.get(&identity(&b)), Some(200));
    }

    #[test]
    fn test_without_sort_by_time_keeps_declared_order() {
        let a = choice("a", &[]);
        let b = choice("b", &[]);
        let mut command = CommandDefinition::new("cmd", "echo");
        command
            .parameters
            .push(ParameterDefinition::with_choices("p", vec![a.clone(), b.clone()]));

        let mut recency = RecencyCache::new();
        recency.set(identity(&b), 200);

        let mut prompter = ScriptedPrompter::new(vec![Answer::Pick(Some(0))]);
        resolve(&command, &TagSet::new(), &mut prompter, &mut recency).unwrap();
        assert_eq!(prompter.presented[0], vec!["a", "b"]);
    }

    #[test]
    fn test_add_tags_unlock_later_parameters_and_choices() {
        let mut granting = choice("prod", &[]);
        granting.add_tags = tags(&["x"]);

        let mut confirm = ParameterDefinition::free_text("confirm");
        confirm.tags = tags(&["x"]);

        let mut command = CommandDefinition::new("cmd", "deploy");
        command.parameters.push(ParameterDefinition::with_choices(
            "env",
            vec![granting, choice("dev", &[])],
        ));
        command.parameters.push(ParameterDefinition::with_choices(
            "region",
            vec![choice("eu", &["x"]), choice("us", &[])],
        ));
        command.parameters.push(confirm);

        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Pick(Some(0)),
            Answer::Pick(Some(0)),
            Answer::Text(Some("yes")),
        ]);
        let mut recency = RecencyCache::new();
        let seed = TagSet::new();

        let values = resolve(&command, &seed, &mut prompter, &mut recency).unwrap();
        assert_eq!(values, vec!["prod", "eu", "yes"]);
        assert_eq!(prompter.presented[1], vec!["eu", "us"]);
        // The seed itself is not modified
        assert!(seed.is_empty());
    }

    #[test]
    fn test_hidden_parameters_stay_hidden_without_grant() {
        let mut confirm = ParameterDefinition::free_text("confirm");
        confirm.tags = tags(&["x"]);

        let mut command = CommandDefinition::new("cmd", "deploy");
        command.parameters.push(ParameterDefinition::with_choices(
            "env",
            vec![choice("dev", &[])],
        ));
        command.parameters.push(confirm);

        let mut prompter = ScriptedPrompter::new(vec![Answer::Pick(Some(0))]);
        let mut recency = RecencyCache::new();

        let values = resolve(&command, &TagSet::new(), &mut prompter, &mut recency).unwrap();
        assert_eq!(values, vec!["dev"]);
    }

    #[test]
    fn test_seeded_tags_show_tagged_parameters() {
        let mut parameter = ParameterDefinition::free_text("p");
        parameter.tags = tags(&["work"]);
        let mut command = CommandDefinition::new("cmd", "echo");
        command.parameters.push(parameter);

        let mut prompter = ScriptedPrompter::new(vec![Answer::Text(Some("v"))]);
        let mut recency = RecencyCache::new();

        let values = resolve(&command, &seed_tags(["work"]), &mut prompter, &mut recency).unwrap();
        assert_eq!(values, vec!["v"]);
    }

    #[test]
    fn test_dismissed_pick_is_user_cancelled_and_not_recorded() {
        let mut command = CommandDefinition::new("cmd", "echo");
        command
            .parameters
            .push(ParameterDefinition::with_choices("p", vec![choice("a", &[])]));

        let mut prompter = ScriptedPrompter::new(vec![Answer::Pick(None)]);
        let mut recency = RecencyCache::new();

        let result = resolve(&command, &TagSet::new(), &mut prompter, &mut recency);
        assert!(matches!(result, Err(Error::UserCancelled)));
        assert!(recency.is_empty());
    }

    #[test]
    fn test_picked_label_is_trimmed() {
        let mut command = CommandDefinition::new("cmd", "echo");
        command
            .parameters
            .push(ParameterDefinition::with_choices("p", vec![choice(" a ", &[])]));

        let mut prompter = ScriptedPrompter::new(vec![Answer::Pick(Some(0))]);
        let mut recency = RecencyCache::new();

        let values = resolve(&command, &TagSet::new(), &mut prompter, &mut recency).unwrap();
        assert_eq!(values, vec!["a"]);
    }
}
