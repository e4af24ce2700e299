use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use savestream::xml::{DeserializationHooks, Namespaces, WriterOptions};
use savestream::{Error, XmlStreamSerializer};

use crate::utility::{SaveData, from_bytes, save_data, to_bytes};

#[test]
fn shared_serializer_across_threads() -> Result<(), Error> {
    let unknown = Arc::new(AtomicUsize::new(0));
    let hooks = DeserializationHooks::new().on_unknown_element({
        let unknown = unknown.clone();
        move |_| {
            unknown.fetch_add(1, Ordering::Relaxed);
        }
    });
    let serializer = XmlStreamSerializer::new()
        .with_writer_options(WriterOptions::indented())
        .with_namespaces(Namespaces::new().add("", "urn:game:save"))
        .with_hooks(hooks);

    let results: Vec<Result<(), Error>> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..8u32)
            .map(|index| {
                let serializer = &serializer;
                scope.spawn(move || -> Result<(), Error> {
                    let value = SaveData { level: index, ..save_data() };
                    let bytes = to_bytes(serializer, Some(&value))?;
                    assert_eq!(from_bytes::<_, SaveData>(serializer, &bytes)?, Some(value));
                    Ok(())
                })
            })
            .collect();
        workers.into_iter().map(|worker| worker.join().expect("worker panicked")).collect()
    });

    for result in results {
        result?;
    }
    assert_eq!(unknown.load(Ordering::Relaxed), 0);
    Ok(())
}
