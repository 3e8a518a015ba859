//! Interactive add/edit wizard for subscription records.

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use crate::cli::core::CommandError;
use crate::ledger::{BillingCadence, Category, SubscriptionDraft};

/// Outcome of one wizard run.
#[derive(Debug, Clone, PartialEq)]
pub enum FormResult {
    Saved(SubscriptionDraft),
    Deleted,
    Cancelled,
}

/// Collects every subscription field, pre-filling from `initial` when
/// editing. Deletion is offered only in the editing flow.
pub struct SubscriptionWizard<'a> {
    theme: &'a ColorfulTheme,
    initial: Option<SubscriptionDraft>,
    default_renew_day: u32,
}

impl<'a> SubscriptionWizard<'a> {
    pub fn add(theme: &'a ColorfulTheme, default_renew_day: u32) -> Self {
        Self {
            theme,
            initial: None,
            default_renew_day,
        }
    }

    pub fn edit(theme: &'a ColorfulTheme, current: SubscriptionDraft) -> Self {
        let default_renew_day = current.renew_day;
        Self {
            theme,
            initial: Some(current),
            default_renew_day,
        }
    }

    fn is_editing(&self) -> bool {
        self.initial.is_some()
    }

    pub fn run(&self) -> Result<FormResult, CommandError> {
        let name = self.prompt_name()?;
        let category = self.prompt_category()?;
        let billing = self.prompt_billing()?;
        let price = self.prompt_price()?;
        let renew_day = self.prompt_renew_day()?;

        let draft = SubscriptionDraft {
            name,
            category,
            billing,
            price,
            renew_day,
        };

        if self.is_editing() {
            self.confirm_edit(draft)
        } else {
            self.confirm_add(draft)
        }
    }

    fn prompt_name(&self) -> Result<String, CommandError> {
        let mut input = Input::<String>::with_theme(self.theme)
            .with_prompt("Name (e.g. Netflix)")
            .validate_with(|value: &String| -> Result<(), &str> {
                if value.trim().is_empty() {
                    Err("name must not be empty")
                } else {
                    Ok(())
                }
            });
        if let Some(initial) = &self.initial {
            input = input.default(initial.name.clone());
        }
        Ok(input.interact_text()?.trim().to_string())
    }

    fn prompt_category(&self) -> Result<Category, CommandError> {
        let labels: Vec<String> = Category::ALL
            .iter()
            .map(|category| format!("{} {}", category.icon(), category.label()))
            .collect();
        let default = self
            .initial
            .as_ref()
            .and_then(|draft| Category::ALL.iter().position(|c| *c == draft.category))
            .unwrap_or(0);
        let index = Select::with_theme(self.theme)
            .with_prompt("Category")
            .items(&labels)
            .default(default)
            .interact()?;
        Ok(Category::ALL[index])
    }

    fn prompt_billing(&self) -> Result<BillingCadence, CommandError> {
        let labels: Vec<&str> = BillingCadence::ALL
            .iter()
            .map(|cadence| cadence.label())
            .collect();
        let default = self
            .initial
            .as_ref()
            .and_then(|draft| BillingCadence::ALL.iter().position(|b| *b == draft.billing))
            .unwrap_or(0);
        let index = Select::with_theme(self.theme)
            .with_prompt("Billing")
            .items(&labels)
            .default(default)
            .interact()?;
        Ok(BillingCadence::ALL[index])
    }

    fn prompt_price(&self) -> Result<f64, CommandError> {
        let mut input = Input::<f64>::with_theme(self.theme)
            .with_prompt("Price in USD")
            .validate_with(|value: &f64| -> Result<(), &str> {
                if value.is_finite() && *value >= 0.0 {
                    Ok(())
                } else {
                    Err("price must be a non-negative amount")
                }
            });
        if let Some(initial) = &self.initial {
            input = input.default(initial.price);
        }
        Ok(input.interact_text()?)
    }

    fn prompt_renew_day(&self) -> Result<u32, CommandError> {
        let input = Input::<u32>::with_theme(self.theme)
            .with_prompt("Renews on day of month")
            .validate_with(|value: &u32| -> Result<(), &str> {
                if (1..=31).contains(value) {
                    Ok(())
                } else {
                    Err("renewal day must be between 1 and 31")
                }
            })
            .default(self.default_renew_day);
        Ok(input.interact_text()?)
    }

    fn confirm_add(&self, draft: SubscriptionDraft) -> Result<FormResult, CommandError> {
        let confirmed = Confirm::with_theme(self.theme)
            .with_prompt(format!("Add `{}`?", draft.name))
            .default(true)
            .interact()?;
        if confirmed {
            Ok(FormResult::Saved(draft))
        } else {
            Ok(FormResult::Cancelled)
        }
    }

    fn confirm_edit(&self, draft: SubscriptionDraft) -> Result<FormResult, CommandError> {
        const SAVE: usize = 0;
        const DELETE: usize = 1;
        let actions = ["Save changes", "Delete subscription", "Cancel"];
        let choice = Select::with_theme(self.theme)
            .with_prompt("Apply")
            .items(&actions)
            .default(SAVE)
            .interact()?;
        Ok(match choice {
            SAVE => FormResult::Saved(draft),
            DELETE => FormResult::Deleted,
            _ => FormResult::Cancelled,
        })
    }
}
