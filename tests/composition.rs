//! End-to-end composition test: registry, guards, hook pipelines, and a
//! resource orchestrator wired together the way an application would.

use std::sync::{Arc, Mutex};

use plinth::{
    CollectingSink, Context, EventSink, HookError, HookPoint, Registry, Resource, Token,
};

#[derive(Debug, Clone, PartialEq)]
struct Invoice {
    number: String,
    total_cents: u64,
    approved: bool,
}

/// A service invoices depend on, gated behind the billing token.
struct Sequencer {
    issued: Mutex<u64>,
}

impl Sequencer {
    fn next(&self) -> u64 {
        let mut issued = self.issued.lock().unwrap();
        *issued += 1;
        *issued
    }
}

#[test]
fn full_application_lifecycle() {
    let sink = Arc::new(CollectingSink::new());

    // Composition root: start, register, freeze.
    let registry = Arc::new(Registry::with_sink(
        Arc::clone(&sink) as Arc<dyn EventSink>
    ));
    let key = registry.start();
    let billing = Token::new("billing");

    let _ = registry
        .register(&key, Sequencer { issued: Mutex::new(0) })
        .restrict([billing.clone()]);
    registry.freeze(&key);
    assert!(registry.is_frozen());

    // One introspection pass over the composed application.
    let services = registry.services(&key).unwrap();
    assert_eq!(services.len(), 1);
    assert_eq!(services[0].guards, 1);

    // Wire the orchestrator: numbering on create, validation on update.
    let invoices: Resource<Invoice> =
        Resource::with_sink(Arc::clone(&registry), Arc::clone(&sink) as Arc<dyn EventSink>);

    {
        let registry = Arc::clone(&registry);
        let billing = billing.clone();
        invoices.before_create(move |_ctx, mut invoice: Invoice| {
            let ctx = Context::new().with_token(billing.clone());
            let sequencer = registry
                .use_service::<Sequencer>(&ctx)
                .map_err(|err| HookError::new(err.to_string()))?;
            invoice.number = format!("INV-{:04}", sequencer.next());
            Ok(invoice)
        });
    }
    invoices.before_update(|_ctx, invoice: Invoice| {
        if invoice.total_cents == 0 {
            Err(HookError::new("empty invoice"))
        } else {
            Ok(invoice)
        }
    });
    invoices.after_update(|_ctx, mut invoice: Invoice| {
        invoice.approved = true;
        Ok(invoice)
    });
    invoices.hooks().build();
    assert!(invoices.hooks().has_hooks(HookPoint::BeforeCreate));

    // Create: the hook resolves the guarded sequencer through the registry.
    let draft = Invoice {
        number: String::new(),
        total_cents: 12_500,
        approved: false,
    };
    let created = invoices.create(&Context::new(), draft).unwrap();
    assert_eq!(created.number, "INV-0001");

    // Update: before-hook vetoes the bad write, accepts the good one.
    let err = invoices
        .update(
            &Context::new(),
            "INV-0001",
            Invoice {
                total_cents: 0,
                ..created.clone()
            },
        )
        .unwrap_err();
    assert_eq!(err.to_string(), "empty invoice");

    let updated = invoices
        .update(&Context::new(), "INV-0001", created.clone())
        .unwrap();
    assert!(updated.approved);

    // Delete closes the lifecycle.
    invoices.delete(&Context::new(), "INV-0001", updated).unwrap();

    // Direct lookups without the billing token are refused.
    assert!(registry.use_service::<Sequencer>(&Context::new()).is_err());

    // The shared sink saw the whole story, in order.
    let names = sink.names();
    assert_eq!(names.first(), Some(&"registration"));
    assert!(names.contains(&"access-granted"));
    assert!(names.contains(&"access-denied"));
    assert!(names.contains(&"hook-failed"));
    assert!(names.contains(&"resource-created"));
    assert!(names.contains(&"resource-updated"));
    assert!(names.contains(&"resource-deleted"));
}

#[test]
fn reset_isolates_composition_between_tests() {
    struct Cache;

    let registry = Arc::new(Registry::new());
    let key = registry.start();
    let _ = registry.register(&key, Cache);
    registry.freeze(&key);
    assert!(registry.use_service::<Cache>(&Context::new()).is_ok());

    // Tear down and compose again from scratch; the old key is dead.
    registry.reset();
    assert!(registry.services(&key).is_err());

    let key = registry.start();
    registry.freeze(&key);
    assert!(registry.use_service::<Cache>(&Context::new()).is_err());
}

#[test]
fn prelude_covers_the_common_path() {
    use plinth::prelude::*;

    #[derive(Clone)]
    struct Note {
        body: String,
    }

    let registry = std::sync::Arc::new(Registry::new());
    let key = registry.start();
    registry.freeze(&key);

    let notes: Resource<Note> = Resource::new(registry);
    notes.before_create(|_ctx, note: Note| {
        if note.body.is_empty() {
            Err(HookError::new("empty note"))
        } else {
            Ok(note)
        }
    });

    let note = notes
        .create(&Context::new(), Note { body: "hello".into() })
        .unwrap();
    assert_eq!(note.body, "hello");
}
