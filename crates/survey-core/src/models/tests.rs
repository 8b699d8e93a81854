#[cfg(test)]
mod ticket_tests {
    use jiff::Timestamp;
    use uuid::Uuid;

    use crate::{
        error::SurveyError,
        models::{
            Catalog, Company, Keyboard, KeyboardType, LocalizedText, Participant, PlanType,
            Question, QuestionAnswer, Schedule, Survey, SurveyModule, SurveyTicket, TodoStatus,
        },
    };

    fn create_test_question(spss_id: &str, keyboard_type: KeyboardType, sort_index: i32) -> Question {
        Question {
            id: Uuid::new_v4(),
            spss_id: spss_id.to_string(),
            text: vec![LocalizedText::new("de", "Frage")],
            keyboard: Keyboard {
                keyboard_type,
                ..Default::default()
            },
            sort_index,
            estimated_duration: 10.0,
            measured_duration: 0.0,
            answer: None,
            answered_at: None,
            application_identifier: None,
        }
    }

    fn create_test_module(questions: Vec<Question>) -> SurveyModule {
        let now = Timestamp::from_second(1640995200).unwrap();
        let mut module = SurveyModule {
            id: Uuid::new_v4(),
            company_id: Uuid::nil(),
            name: "Wellbeing".to_string(),
            description: None,
            questions: Vec::new(),
            estimated_duration: 0.0,
            is_draft: false,
            created_at: now,
            updated_at: now,
        };
        for question in questions {
            module.insert_question(question);
        }
        module
    }

    fn schedule(start: i64, end: i64) -> Option<Schedule> {
        Some(Schedule {
            start_date: Timestamp::from_second(start).unwrap(),
            end_date: Timestamp::from_second(end).unwrap(),
            notifications: Vec::new(),
        })
    }

    /// Published catalog whose base wave holds a text and an information
    /// question.
    fn create_test_catalog() -> Catalog {
        let mut catalog = Catalog::new("Pulse", Uuid::nil(), Timestamp::from_second(1640995200).unwrap());
        let module = create_test_module(vec![
            create_test_question("TXT1", KeyboardType::Text, 1),
            create_test_question("INFO1", KeyboardType::Information, 2),
        ]);
        catalog
            .assign_survey(PlanType::Base, Survey { modules: vec![module] })
            .unwrap();
        catalog.base_plan.schedule = schedule(1_700_000_000, 1_700_086_400);
        catalog.end_plan.schedule = schedule(1_700_200_000, 1_700_286_400);
        catalog.build_templates().unwrap();
        catalog.is_draft = false;
        catalog
    }

    fn create_test_ticket(catalog: &Catalog) -> SurveyTicket {
        let now = Timestamp::from_second(1641081600).unwrap();
        let company = Company {
            id: Uuid::nil(),
            name: "ACME".to_string(),
            created_at: now,
            updated_at: now,
        };
        let participant = Participant {
            id: Uuid::new_v4(),
            company_id: Uuid::nil(),
            email: "jane@example.com".to_string(),
            first_name: Some("Jane".to_string()),
            last_name: None,
            language: "de".to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        SurveyTicket::issue(catalog, company, participant, "Ab12Cd".to_string(), now)
    }

    /// Ticket whose base todo went active and was enriched.
    fn create_active_ticket() -> (Catalog, SurveyTicket, Uuid) {
        let catalog = create_test_catalog();
        let mut ticket = create_test_ticket(&catalog);
        let todo_id = ticket.todos[0].id;
        ticket.todos[0].questions.clear();
        assert!(ticket.apply_todo_states(&[(todo_id, TodoStatus::Active)]));
        assert!(ticket
            .enrich_active_todos(&catalog, Timestamp::now())
            .unwrap());
        (catalog, ticket, todo_id)
    }

    fn answer_for(question: &Question, duration: f32) -> QuestionAnswer {
        QuestionAnswer {
            question_id: question.id,
            answer: "Gut".to_string(),
            measured_duration: duration,
        }
    }

    #[test]
    fn test_issue_copies_templates_locked() {
        let catalog = create_test_catalog();
        let ticket = create_test_ticket(&catalog);

        assert_eq!(ticket.todos.len(), 2);
        assert!(ticket.todos.iter().all(|t| t.status == TodoStatus::Locked));
        assert_eq!(ticket.todos[0].id, catalog.ticket_todos[0].id);
        assert_eq!(ticket.todos[0].questions.len(), 2);
        assert_eq!(ticket.start_date, catalog.start_date);
        assert_eq!(ticket.version, 0);
    }

    #[test]
    fn test_text_and_information_scenario() {
        let (_, mut ticket, todo_id) = create_active_ticket();
        let text = ticket.todos[0].questions[0].clone();
        assert_eq!(text.keyboard.keyboard_type, KeyboardType::Text);

        let todo = ticket
            .answer_questions(todo_id, &[answer_for(&text, 4.0)], Some("ios"), Timestamp::now())
            .unwrap();
        assert_eq!(todo.progress, 100.0);

        let todo = ticket.submit_todo(todo_id, Some("ios"), Timestamp::now()).unwrap();
        assert_eq!(todo.status, TodoStatus::Done);
    }

    #[test]
    fn test_submit_on_done_todo_is_not_found() {
        let (_, mut ticket, todo_id) = create_active_ticket();
        let text = ticket.todos[0].questions[0].clone();
        ticket
            .answer_questions(todo_id, &[answer_for(&text, 1.0)], None, Timestamp::now())
            .unwrap();
        ticket.submit_todo(todo_id, None, Timestamp::now()).unwrap();

        let err = ticket.submit_todo(todo_id, None, Timestamp::now()).unwrap_err();
        assert!(matches!(err, SurveyError::TodoNotFound { .. }));

        let err = ticket
            .answer_questions(todo_id, &[answer_for(&text, 1.0)], None, Timestamp::now())
            .unwrap_err();
        assert!(matches!(err, SurveyError::TodoNotFound { .. }));
    }

    #[test]
    fn test_incomplete_submit_leaves_ticket_unchanged() {
        let (_, mut ticket, todo_id) = create_active_ticket();
        let before = ticket.clone();

        let err = ticket.submit_todo(todo_id, Some("web"), Timestamp::now()).unwrap_err();
        assert!(matches!(err, SurveyError::SurveyIncomplete { unanswered: 1, .. }));
        assert_eq!(ticket, before);
    }

    #[test]
    fn test_locked_todo_rejects_answers() {
        let catalog = create_test_catalog();
        let mut ticket = create_test_ticket(&catalog);
        let todo_id = ticket.todos[0].id;

        let err = ticket
            .answer_questions(todo_id, &[], None, Timestamp::now())
            .unwrap_err();
        assert!(matches!(err, SurveyError::TodoNotFound { id } if id == todo_id));
    }

    #[test]
    fn test_answered_questions_reads_any_state() {
        let (_, mut ticket, todo_id) = create_active_ticket();
        assert!(ticket.answered_questions(todo_id).unwrap().is_empty());

        let text = ticket.todos[0].questions[0].clone();
        ticket
            .answer_questions(todo_id, &[answer_for(&text, 2.5)], None, Timestamp::now())
            .unwrap();
        ticket.submit_todo(todo_id, None, Timestamp::now()).unwrap();

        let answered = ticket.answered_questions(todo_id).unwrap();
        assert_eq!(answered.len(), 1);
        assert_eq!(answered[0].id, text.id);

        let err = ticket.answered_questions(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, SurveyError::TodoNotFound { .. }));
    }

    #[test]
    fn test_enrichment_happens_once() {
        let (mut catalog, mut ticket, todo_id) = create_active_ticket();
        let enriched_at = ticket.todos[0].enriched_at;

        catalog.ticket_todos[0].questions.clear();
        let changed = ticket.enrich_active_todos(&catalog, Timestamp::now()).unwrap();

        assert!(!changed);
        assert_eq!(ticket.todo(todo_id).unwrap().questions.len(), 2);
        assert_eq!(ticket.todos[0].enriched_at, enriched_at);
    }

    #[test]
    fn test_enrichment_without_template_fails_untouched() {
        let catalog = create_test_catalog();
        let mut ticket = create_test_ticket(&catalog);
        ticket.todos[0].status = TodoStatus::Active;
        ticket.todos[1].status = TodoStatus::Active;
        ticket.todos[1].id = Uuid::new_v4();
        let before = ticket.clone();

        let err = ticket
            .enrich_active_todos(&catalog, Timestamp::now())
            .unwrap_err();

        assert!(matches!(err, SurveyError::TemplateNotFound { .. }));
        assert_eq!(ticket, before);
    }

    #[test]
    fn test_apply_states_never_reopens_done() {
        let (_, mut ticket, todo_id) = create_active_ticket();
        let text = ticket.todos[0].questions[0].clone();
        ticket
            .answer_questions(todo_id, &[answer_for(&text, 1.0)], None, Timestamp::now())
            .unwrap();
        ticket.submit_todo(todo_id, None, Timestamp::now()).unwrap();

        let changed = ticket.apply_todo_states(&[
            (todo_id, TodoStatus::Expired),
            (todo_id, TodoStatus::Locked),
        ]);
        assert!(!changed);
        assert_eq!(ticket.todos[0].status, TodoStatus::Done);
    }

    #[test]
    fn test_notification_sent_bookkeeping() {
        let catalog = create_test_catalog();
        let mut ticket = create_test_ticket(&catalog);
        let (notification, todo) = (Uuid::new_v4(), ticket.todos[0].id);

        assert!(!ticket.is_notification_sent(notification, todo));
        ticket.mark_notification_sent(notification, todo, Timestamp::now());
        ticket.mark_notification_sent(notification, todo, Timestamp::now());
        assert!(ticket.is_notification_sent(notification, todo));
        assert!(!ticket.is_notification_sent(notification, ticket.todos[1].id));
        assert_eq!(ticket.sent_notifications.len(), 1);
    }
}
