//! Tag bridge backed by the `lofty` crate.

use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, ItemValue, Tag, TagExt, TagItem, TagType};
use std::path::Path;
use tracing::debug;

use super::error::TagError;
use super::traits::TagBridge;
use super::types::{keys, TagSet};

/// Reads and writes tags with `lofty`, mapping field names onto `lofty`'s
/// generic item keys.
///
/// Canonical names map to their item keys directly. Other names use Vorbis
/// comment field names (`musicbrainz_trackid`, `replaygain_track_gain`), so a
/// field keeps its meaning across containers. Names `lofty` does not know are
/// carried as custom fields (a TXXX frame in ID3v2, a raw comment in Vorbis).
/// Fields the target container cannot represent are skipped on write.
#[derive(Debug, Clone, Default)]
pub struct LoftyTagBridge;

impl LoftyTagBridge {
    pub fn new() -> Self {
        Self
    }
}

fn canonical_key(name: &str) -> Option<ItemKey> {
    let key = match name {
        keys::TITLE => ItemKey::TrackTitle,
        keys::ARTIST => ItemKey::TrackArtist,
        keys::ALBUM => ItemKey::AlbumTitle,
        keys::ALBUM_ARTIST => ItemKey::AlbumArtist,
        keys::TRACK_NUMBER => ItemKey::TrackNumber,
        keys::TRACK_TOTAL => ItemKey::TrackTotal,
        keys::DISC_NUMBER => ItemKey::DiscNumber,
        keys::DISC_TOTAL => ItemKey::DiscTotal,
        keys::DATE => ItemKey::RecordingDate,
        keys::GENRE => ItemKey::Genre,
        keys::COMMENT => ItemKey::Comment,
        keys::COMPOSER => ItemKey::Composer,
        _ => return None,
    };
    Some(key)
}

fn canonical_name(key: &ItemKey) -> Option<&'static str> {
    let name = match key {
        ItemKey::TrackTitle => keys::TITLE,
        ItemKey::TrackArtist => keys::ARTIST,
        ItemKey::AlbumTitle => keys::ALBUM,
        ItemKey::AlbumArtist => keys::ALBUM_ARTIST,
        ItemKey::TrackNumber => keys::TRACK_NUMBER,
        ItemKey::TrackTotal => keys::TRACK_TOTAL,
        ItemKey::DiscNumber => keys::DISC_NUMBER,
        ItemKey::DiscTotal => keys::DISC_TOTAL,
        ItemKey::RecordingDate => keys::DATE,
        ItemKey::Genre => keys::GENRE,
        ItemKey::Comment => keys::COMMENT,
        ItemKey::Composer => keys::COMPOSER,
        _ => return None,
    };
    Some(name)
}

/// Item key for a field name. Never fails: unknown names become
/// [`ItemKey::Unknown`].
fn item_key(name: &str) -> ItemKey {
    canonical_key(name).unwrap_or_else(|| ItemKey::from_key(TagType::VorbisComments, name))
}

/// Field name for an item key, `None` when the key has no textual name.
fn field_name(key: &ItemKey) -> Option<String> {
    if let Some(name) = canonical_name(key) {
        return Some(name.to_string());
    }
    key.map_key(TagType::VorbisComments, true)
        .map(str::to_lowercase)
}

impl TagBridge for LoftyTagBridge {
    fn name(&self) -> &str {
        "lofty"
    }

    fn read(&self, path: &Path) -> Result<TagSet, TagError> {
        let tagged_file = Probe::open(path)
            .map_err(|e| TagError::read(path, e))?
            .read()
            .map_err(|e| TagError::read(path, e))?;

        let mut tags = TagSet::new();
        if let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) {
            for item in tag.items() {
                let Some(text) = item.value().text() else {
                    continue;
                };
                match field_name(item.key()) {
                    Some(name) => tags.append(name, text),
                    None => debug!(path = %path.display(), key = ?item.key(), "Skipping unnamed field"),
                }
            }
        }

        debug!(path = %path.display(), fields = tags.len(), "Read tags");
        Ok(tags)
    }

    fn write(&self, path: &Path, tags: &TagSet) -> Result<(), TagError> {
        let mut tagged_file = Probe::open(path)
            .map_err(|e| TagError::write(path, e))?
            .read()
            .map_err(|e| TagError::write(path, e))?;

        if tagged_file.primary_tag().is_none() {
            let tag_type = tagged_file.primary_tag_type();
            tagged_file.insert_tag(Tag::new(tag_type));
        }

        let tag = tagged_file
            .primary_tag_mut()
            .ok_or_else(|| TagError::write(path, "format cannot hold a tag"))?;

        for (name, values) in tags.fields() {
            let key = item_key(name);
            tag.remove_key(&key);

            for value in values {
                let item = TagItem::new(key.clone(), ItemValue::Text(value.clone()));
                if matches!(key, ItemKey::Unknown(_)) {
                    // Custom field names are checked against the container's rules on save.
                    tag.push_unchecked(item);
                } else if !tag.push(item) {
                    debug!(path = %path.display(), field = name, "Field not supported by container");
                    break;
                }
            }
        }

        tag.save_to_path(path, WriteOptions::default())
            .map_err(|e| TagError::write(path, e))?;

        debug!(path = %path.display(), fields = tags.len(), "Wrote tags");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavSpec, WavWriter};

    fn write_silence(path: &Path) {
        let spec = WavSpec {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for _ in 0..4410 {
            writer.write_sample(0i16).unwrap();
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_key_mapping_is_symmetric() {
        for name in [
            keys::TITLE,
            keys::ARTIST,
            keys::ALBUM,
            keys::ALBUM_ARTIST,
            keys::TRACK_NUMBER,
            keys::TRACK_TOTAL,
            keys::DISC_NUMBER,
            keys::DISC_TOTAL,
            keys::DATE,
            keys::GENRE,
            keys::COMMENT,
            keys::COMPOSER,
        ] {
            let key = item_key(name);
            assert_eq!(canonical_name(&key), Some(name));
            assert_eq!(field_name(&key).as_deref(), Some(name));
        }
    }

    #[test]
    fn test_other_fields_use_vorbis_names() {
        assert_eq!(item_key("replaygain_track_gain"), ItemKey::ReplayGainTrackGain);
        assert_eq!(item_key("musicbrainz_trackid"), ItemKey::MusicBrainzRecordingId);
        assert_eq!(
            field_name(&ItemKey::ReplayGainTrackGain).as_deref(),
            Some("replaygain_track_gain")
        );

        let custom = item_key("x-rip-log");
        assert_eq!(custom, ItemKey::Unknown("x-rip-log".to_string()));
        assert_eq!(field_name(&custom).as_deref(), Some("x-rip-log"));
    }

    /// Smallest file `lofty` accepts as FLAC: the marker, a STREAMINFO block
    /// and a trailing PADDING block, no audio frames.
    fn write_empty_flac(path: &Path) {
        let mut bytes = b"fLaC".to_vec();

        bytes.extend_from_slice(&[0x00, 0x00, 0x00, 34]);
        bytes.extend_from_slice(&4096u16.to_be_bytes());
        bytes.extend_from_slice(&4096u16.to_be_bytes());
        bytes.extend_from_slice(&[0; 6]);
        // sample rate (20 bits), channels - 1 (3), bits per sample - 1 (5), total samples (36)
        let packed: u64 = (44100 << 44) | (1 << 41) | (15 << 36);
        bytes.extend_from_slice(&packed.to_be_bytes());
        bytes.extend_from_slice(&[0; 16]);

        bytes.extend_from_slice(&[0x81, 0x00, 0x00, 64]);
        bytes.extend_from_slice(&[0; 64]);

        std::fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_flac_keeps_non_canonical_and_repeated_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("track.flac");
        write_empty_flac(&path);

        let bridge = LoftyTagBridge::new();
        let written = TagSet::new()
            .with(keys::TITLE, "So What")
            .with(keys::ARTIST, "Miles Davis")
            .and(keys::ARTIST, "John Coltrane")
            .with("musicbrainz_trackid", "6c7d6ce7-2a6b-4a4a-9b7a-0e3f5c1d2b9a")
            .with("replaygain_track_gain", "-7.89 dB")
            .with("x-rip-log", "EAC 1.6, secure mode");
        bridge.write(&path, &written).unwrap();

        let read = bridge.read(&path).unwrap();
        assert!(read.contains_all(&written), "read back {:?}", read);
        assert_eq!(read.get_all(keys::ARTIST), ["Miles Davis", "John Coltrane"]);
    }

    #[test]
    fn test_id3v2_keeps_custom_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("track.wav");
        write_silence(&path);

        let bridge = LoftyTagBridge::new();
        let written = TagSet::new()
            .with(keys::TITLE, "Blue in Green")
            .with("replaygain_track_gain", "-3.10 dB")
            .with("x-rip-log", "EAC 1.6, secure mode");
        bridge.write(&path, &written).unwrap();

        let read = bridge.read(&path).unwrap();
        assert!(read.contains_all(&written), "read back {:?}", read);
    }

    #[test]
    fn test_untagged_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("silence.wav");
        write_silence(&path);

        let tags = LoftyTagBridge::new().read(&path).unwrap();
        assert!(tags.is_empty());
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tagged.wav");
        write_silence(&path);

        let bridge = LoftyTagBridge::new();
        let written = TagSet::new()
            .with(keys::TITLE, "All Blues")
            .with(keys::ARTIST, "Miles Davis")
            .with(keys::ALBUM, "Kind of Blue")
            .with(keys::GENRE, "Jazz");
        bridge.write(&path, &written).unwrap();

        let read = bridge.read(&path).unwrap();
        assert!(read.contains_all(&written), "read back {:?}", read);
    }

    #[test]
    fn test_write_merges_with_existing_tags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merge.wav");
        write_silence(&path);

        let bridge = LoftyTagBridge::new();
        bridge
            .write(&path, &TagSet::new().with(keys::TITLE, "First").with(keys::ALBUM, "Kept"))
            .unwrap();
        bridge
            .write(&path, &TagSet::new().with(keys::TITLE, "Second"))
            .unwrap();

        let read = bridge.read(&path).unwrap();
        assert_eq!(read.get(keys::TITLE), Some("Second"));
        assert_eq!(read.get(keys::ALBUM), Some("Kept"));
    }

    #[test]
    fn test_unreadable_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise");
        std::fs::write(&path, b"definitely not audio").unwrap();

        let err = LoftyTagBridge::new().read(&path).unwrap_err();
        assert!(matches!(err, TagError::Read { .. }));

        let err = LoftyTagBridge::new()
            .write(&path, &TagSet::new().with(keys::TITLE, "x"))
            .unwrap_err();
        assert!(matches!(err, TagError::Write { .. }));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = LoftyTagBridge::new()
            .read(Path::new("/nonexistent/track.flac"))
            .unwrap_err();
        assert!(matches!(err, TagError::Read { .. }));
    }
}
