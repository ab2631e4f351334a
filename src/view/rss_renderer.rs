use std::io::Cursor;

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::content::ScrollPost;

/* Example
<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
<channel>
  <title>The Scroll</title>
  <link>https://realms.example</link>
  <description>Updates and thoughts from the Realms</description>
  <item>
    <title>Season One: The Realms Awaken</title>
    <link>https://realms.example/scroll/season-one</link>
    <guid isPermaLink="false">season-one</guid>
    <description><![CDATA[Everything you need to know about the first season.]]></description>
    <pubDate>Tue, 10 Feb 2026 00:00:00 +0000</pubDate>
    <category>starknet</category>
  </item>
</channel>
</rss>
*/

pub struct RssChannel<'a> {
    pub ch_title: &'a str,
    pub ch_link: &'a str,
    pub ch_desc: &'a str,
}

impl<'a> RssChannel<'a> {
    pub fn render(&self, posts: &[&ScrollPost]) -> quick_xml::Result<Vec<u8>> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));

        let decl = Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None));
        writer.write_event(decl)?;

        let mut rss = BytesStart::new("rss");
        rss.push_attribute(("version", "2.0"));
        writer.write_event(Event::Start(rss))?;
        writer.write_event(Event::Start(BytesStart::new("channel")))?;

        push_text(&mut writer, "title", self.ch_title)?;
        push_text(&mut writer, "link", self.ch_link)?;
        push_text(&mut writer, "description", self.ch_desc)?;

        for post in posts {
            writer.write_event(Event::Start(BytesStart::new("item")))?;

            push_text(&mut writer, "title", post.title.as_str())?;
            push_text(&mut writer, "link", full_link(self.ch_link, &post.slug).as_str())?;

            let mut guid_elem = BytesStart::new("guid");
            guid_elem.push_attribute(("isPermaLink", "false"));
            writer.write_event(Event::Start(guid_elem))?;
            writer.write_event(Event::Text(BytesText::new(post.slug.as_str())))?;
            writer.write_event(Event::End(BytesEnd::new("guid")))?;

            // Posts without an excerpt ship their whole body
            let description = if post.excerpt.is_empty() { &post.body } else { &post.excerpt };
            push_cdata(&mut writer, "description", description)?;

            // Calendar date, published at midnight UTC
            if let Some(midnight) = post.date.and_hms_opt(0, 0, 0) {
                push_text(&mut writer, "pubDate", &midnight.and_utc().to_rfc2822())?;
            }

            for tag in post.tags.iter() {
                push_text(&mut writer, "category", tag)?;
            }

            writer.write_event(Event::End(BytesEnd::new("item")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("channel")))?;
        writer.write_event(Event::End(BytesEnd::new("rss")))?;

        Ok(writer.into_inner().into_inner())
    }
}

fn full_link(base_url: &str, slug: &str) -> String {
    format!("{}/scroll/{}", base_url.trim_end_matches('/'), slug)
}

fn push_text(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn push_cdata(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    if text.contains("]]>") {
        let new_text = text.replace("]]>", "]] >");
        writer.write_event(Event::CData(BytesCData::new(new_text.as_str())))?;
    } else {
        writer.write_event(Event::CData(BytesCData::new(text)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::str;

    use chrono::NaiveDate;

    use crate::content::ScrollType;

    use super::*;

    fn create_post(slug: &str, excerpt: &str) -> ScrollPost {
        ScrollPost {
            slug: slug.to_string(),
            title: format!("title-of-{}", slug),
            excerpt: excerpt.to_string(),
            author: "Realms Team".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
            scroll_type: ScrollType::Update,
            tags: vec!["starknet".to_string()],
            published: true,
            reading_time_minutes: 1,
            body: format!("<p>body-of-{}</p>", slug),
            cover_image: None,
            canonical_url: None,
        }
    }

    #[test]
    fn render_xml() {
        let first = create_post("one", "summary & more");
        let second = create_post("two", "");

        let rss = RssChannel {
            ch_title: "The Scroll",
            ch_link: "https://realms.example/",
            ch_desc: "Updates",
        };
        let xml = rss.render(&[&first, &second]).unwrap();
        assert_eq!(str::from_utf8(&xml).unwrap(), EXPECTED);
    }

    #[test]
    fn test_full_link() {
        assert_eq!(full_link("https://realms.example", "a"), "https://realms.example/scroll/a");
        assert_eq!(full_link("https://realms.example/", "a"), "https://realms.example/scroll/a");
    }

    const EXPECTED: &str = r##"<?xml version="1.0" encoding="UTF-8"?><rss version="2.0"><channel><title>The Scroll</title><link>https://realms.example/</link><description>Updates</description><item><title>title-of-one</title><link>https://realms.example/scroll/one</link><guid isPermaLink="false">one</guid><description><![CDATA[summary & more]]></description><pubDate>Tue, 10 Feb 2026 00:00:00 +0000</pubDate><category>starknet</category></item><item><title>title-of-two</title><link>https://realms.example/scroll/two</link><guid isPermaLink="false">two</guid><description><![CDATA[<p>body-of-two</p>]]></description><pubDate>Tue, 10 Feb 2026 00:00:00 +0000</pubDate><category>starknet</category></item></channel></rss>"##;
}
