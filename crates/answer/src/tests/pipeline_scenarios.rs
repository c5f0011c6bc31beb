//! End-to-end scenarios for the answer pipeline with in-process stubs.

use crate::fetch::PageFetcher;
use crate::guard::OFF_TOPIC_MESSAGE;
use crate::pipeline::{
    AnswerPipeline, AskInput, AskMode, EMPTY_QUESTION_MESSAGE, FALLBACK_MESSAGE,
};
use crate::synth::Synthesizer;
use crate::wizard::{WizardKey, WizardParams};
use async_trait::async_trait;
use sinapsi_core::AppResult;
use sinapsi_rules::{
    refine, Connector, ConnectorCatalog, Rule, RuleMode, RuleStore, INTERNAL_NOTE_HEADING,
};
use sinapsi_search::{create_client, DomainFilter, SearchResult, WebSearch, WebSearchAdapter};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingSearch {
        results: Vec<SearchResult>,
        calls: AtomicUsize,
    }

    impl CountingSearch {
        fn new(results: Vec<SearchResult>) -> Arc<Self> {
            Arc::new(Self {
                results,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WebSearch for CountingSearch {
        fn provider_name(&self) -> &str {
            "stub"
        }

        async fn search(&self, _query: &str, _limit: usize) -> AppResult<Vec<SearchResult>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.results.clone())
        }
    }

    struct StaticFetcher {
        pages: HashMap<String, String>,
    }

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch_text(&self, url: &str) -> Option<String> {
            self.pages.get(url).cloned()
        }
    }

    const CTF_PAGE: &str = "https://www.tecnaria.com/it/connettori-ctf";
    const CTF_TEXT: &str = "Menu principale. \
        Il connettore CTF si fissa a secco con la chiodatrice P560. \
        La lamiera grecata deve essere ben aderente alla trave. Contatti.";

    fn build_pipeline(search: Arc<dyn WebSearch>, rules: Vec<Rule>) -> AnswerPipeline {
        let fetcher = StaticFetcher {
            pages: HashMap::from([(CTF_PAGE.to_string(), CTF_TEXT.to_string())]),
        };
        let adapter = WebSearchAdapter::new(
            search,
            DomainFilter::new(["tecnaria.com", "spit.eu"]),
            5,
        );
        AnswerPipeline::new(
            Arc::new(RuleStore::from_rules(rules)),
            adapter,
            Synthesizer::new(Arc::new(fetcher)),
        )
    }

    fn ctf_results() -> Vec<SearchResult> {
        vec![
            SearchResult::new("CTF", CTF_PAGE, "Connettori CTF", 1.0),
            SearchResult::new(
                "Concorrente",
                "https://competitor.example/ctf",
                "Connettori per lamiera e soletta. Trave in acciaio.",
                0.8,
            ),
        ]
    }

    fn rule(mode: RuleMode, answer: &str) -> Rule {
        Rule::new("ctf-rule", r"\bctf\b", mode, "it", answer).unwrap()
    }

    #[tokio::test]
    async fn test_override_ignores_search() {
        let answer = "Risposta: Per i connettori CTF usare la P560 con propulsori P560.";
        let search = CountingSearch::new(ctf_results());
        let pipeline = build_pipeline(search.clone(), vec![rule(RuleMode::Override, answer)]);

        let outcome = pipeline.ask(AskInput::new("Come posare i CTF?")).await;
        assert_eq!(outcome.answer, refine(answer));
        assert_eq!(outcome.rule_id.as_deref(), Some("ctf-rule"));
        assert!(outcome.sources.is_empty());

        let empty = build_pipeline(
            CountingSearch::new(vec![]),
            vec![rule(RuleMode::Override, answer)],
        );
        let outcome = empty.ask(AskInput::new("Come posare i CTF?")).await;
        assert_eq!(outcome.answer, refine(answer));
    }

    #[tokio::test]
    async fn test_augment_keeps_draft_first() {
        let search = CountingSearch::new(ctf_results());
        let pipeline = build_pipeline(
            search.clone(),
            vec![rule(RuleMode::Augment, "Verificare sempre il passo.")],
        );

        let outcome = pipeline.ask(AskInput::new("Posa dei CTF su lamiera")).await;
        let draft_at = outcome
            .answer
            .find("Il connettore CTF si fissa a secco")
            .expect("draft text present");
        let rule_at = outcome
            .answer
            .find("Verificare sempre il passo.")
            .expect("rule text present");
        assert!(draft_at < rule_at);
        assert!(outcome.answer.contains("Fonti:\n- https://www.tecnaria.com/it/connettori-ctf"));
        assert_eq!(search.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_question_skips_search() {
        let search = CountingSearch::new(ctf_results());
        let pipeline = build_pipeline(search.clone(), vec![]);

        let outcome = pipeline.ask(AskInput::new("   ")).await;
        assert_eq!(outcome.answer, EMPTY_QUESTION_MESSAGE);
        assert_eq!(search.calls(), 0);
    }

    #[tokio::test]
    async fn test_foreign_hosts_never_cited() {
        let search = CountingSearch::new(ctf_results());
        let pipeline = build_pipeline(search, vec![]);

        let outcome = pipeline.ask(AskInput::new("connettori ctf")).await;
        assert_eq!(outcome.sources, vec![CTF_PAGE.to_string()]);
        assert!(!outcome.answer.contains("competitor.example"));
    }

    #[tokio::test]
    async fn test_missing_key_returns_fallback() {
        let client = create_client("brave", None, None, 6).unwrap();
        let pipeline = build_pipeline(client, vec![]);

        let outcome = pipeline.ask(AskInput::new("connettori ctf")).await;
        assert_eq!(outcome.answer, FALLBACK_MESSAGE);
        assert!(outcome.attachments.is_empty());
    }

    #[tokio::test]
    async fn test_identical_requests_identical_output() {
        let pipeline = build_pipeline(CountingSearch::new(vec![]), vec![]);

        let first = pipeline.ask(AskInput::new("lamiera grecata H55")).await;
        let second = pipeline.ask(AskInput::new("lamiera grecata H55")).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_ctf_mode_reports_missing_params() {
        let pipeline = build_pipeline(CountingSearch::new(vec![]), vec![]);
        let params = WizardParams::new()
            .with(WizardKey::HLamiera, "55")
            .with(WizardKey::Vled, "150");

        let input = AskInput::new("Quanti CTF servono?")
            .with_mode(AskMode::Ctf)
            .with_params(&params);
        assert_eq!(input.context, "lamiera H55, V_L,Ed=150 kN/m");

        let meta = pipeline.ask(input).await.meta.expect("ctf meta");
        assert!(meta.needs_params);
        assert_eq!(
            meta.required_keys,
            vec!["s_soletta", "cls", "passo_gola", "dir_lamiera", "s_long"]
        );

        let generic = pipeline.ask(AskInput::new("Quanti CTF servono?")).await;
        assert!(generic.meta.is_none());
    }

    fn catalog() -> Arc<ConnectorCatalog> {
        Arc::new(ConnectorCatalog::from_connectors(vec![Connector {
            pieces_per_m2: Some(6.0),
            ..Connector::new("CTF 12/40")
        }]))
    }

    #[tokio::test]
    async fn test_off_topic_question_skips_search() {
        let search = CountingSearch::new(ctf_results());
        let pipeline = build_pipeline(search.clone(), vec![]);

        let outcome = pipeline.ask(AskInput::new("Quanto vale un bitcoin?")).await;
        assert_eq!(outcome.answer, OFF_TOPIC_MESSAGE);
        assert_eq!(search.calls(), 0);
    }

    #[tokio::test]
    async fn test_matching_rule_outranks_off_topic_guard() {
        let answer = "Il CTF non si posa su lamiere da car sharing.";
        let search = CountingSearch::new(vec![]);
        let pipeline = build_pipeline(search.clone(), vec![rule(RuleMode::Override, answer)]);

        let outcome = pipeline.ask(AskInput::new("CTF per car port?")).await;
        assert_eq!(outcome.answer, refine(answer));
        assert_eq!(search.calls(), 1);
    }

    #[tokio::test]
    async fn test_internal_note_follows_draft_before_sources() {
        let pipeline =
            build_pipeline(CountingSearch::new(ctf_results()), vec![]).with_connectors(catalog());

        let outcome = pipeline.ask(AskInput::new("Posa del CTF 12/40")).await;
        let note = format!("{}\n• Incidenza media: 6 pz/m²", INTERNAL_NOTE_HEADING);
        let draft_at = outcome.answer.find("Il connettore CTF").expect("draft text present");
        let note_at = outcome.answer.find(&note).expect("note present");
        let sources_at = outcome.answer.find("Fonti:").expect("sources present");
        assert!(draft_at < note_at && note_at < sources_at);
    }

    #[tokio::test]
    async fn test_internal_note_answers_without_web() {
        let catalog = catalog();
        let note = catalog.connectors()[0].technical_note();
        let pipeline =
            build_pipeline(CountingSearch::new(vec![]), vec![]).with_connectors(catalog);

        let outcome = pipeline.ask(AskInput::new("incidenza CTF 12/40")).await;
        assert_eq!(outcome.answer, format!("{}\n{}", INTERNAL_NOTE_HEADING, note));
    }

    #[tokio::test]
    async fn test_override_gets_no_internal_note() {
        let answer = "Usare sempre la P560.";
        let pipeline = build_pipeline(
            CountingSearch::new(vec![]),
            vec![rule(RuleMode::Override, answer)],
        )
        .with_connectors(catalog());

        let outcome = pipeline.ask(AskInput::new("Posa del CTF 12/40")).await;
        assert_eq!(outcome.answer, refine(answer));
    }
}
